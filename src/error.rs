//! Error taxonomy shared by the resolver, the store and the assist collaborators.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    /// Bad user input; the operation is aborted and the database is untouched.
    #[error("{0}")]
    Validation(String),

    #[error("No task with id {0}")]
    NotFound(u64),

    /// The database file exists but is not a JSON array of tasks.
    #[error("Invalid JSON in {}: {}", .path.display(), .source)]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("AI service unavailable: {0}")]
    CollaboratorUnavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TaskError::Validation(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        TaskError::CollaboratorUnavailable(msg.into())
    }

    /// Process exit status for this error when it reaches the front-end.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::CollaboratorUnavailable(_) => 2,
            _ => 1,
        }
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(e: reqwest::Error) -> Self {
        TaskError::CollaboratorUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_failures_exit_with_two() {
        assert_eq!(TaskError::unavailable("no key").exit_code(), 2);
        assert_eq!(TaskError::validation("bad date").exit_code(), 1);
        assert_eq!(TaskError::NotFound(7).exit_code(), 1);
    }

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(TaskError::NotFound(42).to_string(), "No task with id 42");
    }
}
