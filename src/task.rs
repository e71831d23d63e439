//! Task data structure.
//!
//! A `Task` is the only persisted record. Records are created by the add
//! operation and never edited afterwards; removal deletes them outright.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A single to-do record as stored in the JSON database.
///
/// Field order here is the key order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Only present when the task was added with AI assist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Task {
    /// Text shown in listings: the summary when there is one, else the description.
    pub fn display_text(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.description)
    }

    /// Due date in its on-disk `YYYY-MM-DD` form, or an empty string.
    pub fn due_date_text(&self) -> String {
        self.due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// Input to the add operation.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    /// Raw due date text; `None` means the caller is asked for one.
    pub due: Option<String>,
    /// Ask the summarizer for a short summary of the description.
    pub summarize: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due(mut self, due: impl Into<String>) -> Self {
        self.due = Some(due.into());
        self
    }

    pub fn summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_wins_over_description() {
        let mut t = Task {
            id: 1,
            title: "HW1".into(),
            description: "Read chapter one and answer questions".into(),
            due_date: None,
            summary: None,
        };
        assert_eq!(t.display_text(), "Read chapter one and answer questions");
        t.summary = Some("Chapter one questions".into());
        assert_eq!(t.display_text(), "Chapter one questions");
    }

    #[test]
    fn optional_fields_are_omitted_on_disk() {
        let t = Task {
            id: 3,
            title: "Call Alice".into(),
            description: String::new(),
            due_date: None,
            summary: None,
        };
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"id":3,"title":"Call Alice","description":""}"#);
    }

    #[test]
    fn missing_description_reads_as_empty() {
        let t: Task = serde_json::from_str(r#"{"id":1,"title":"x","due_date":"2025-11-30"}"#).unwrap();
        assert_eq!(t.description, "");
        assert_eq!(t.due_date_text(), "2025-11-30");
    }

    #[test]
    fn null_description_reads_as_empty() {
        let t: Task = serde_json::from_str(r#"{"id":2,"title":"y","description":null}"#).unwrap();
        assert_eq!(t.description, "");
    }
}
