//! Task persistence and queries.
//!
//! [`TaskStore`] owns no tasks between calls: every operation resolves the
//! database file, reads the whole collection, works on it in memory and, for
//! mutations, rewrites the whole file before returning.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::assist::{Summarizer, Unavailable};
use crate::error::{Result, TaskError};
use crate::fields::SearchField;
use crate::prompt::{request_due_date, DueDateSource};
use crate::resolver::ResolverConfig;
use crate::task::{NewTask, Task};

/// Result of a successful add.
#[derive(Debug)]
pub struct Added {
    pub task: Task,
    /// Why no summary was stored when one was requested.
    pub summary_error: Option<TaskError>,
}

/// Tasks sharing one due date, or the trailing group with none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueGroup {
    pub due: Option<NaiveDate>,
    pub tasks: Vec<Task>,
}

/// JSON-file backed task collection.
pub struct TaskStore {
    config: ResolverConfig,
    summarizer: Box<dyn Summarizer>,
}

impl TaskStore {
    /// Create a store over the given candidate paths with no summarizer.
    pub fn new(config: ResolverConfig) -> Self {
        TaskStore {
            config,
            summarizer: Box::new(Unavailable::new("no summarizer configured")),
        }
    }

    /// Create a store backed by exactly one file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        TaskStore::new(ResolverConfig::explicit(path))
    }

    pub fn with_summarizer(mut self, summarizer: Box<dyn Summarizer>) -> Self {
        self.summarizer = summarizer;
        self
    }

    /// Path of the database file, creating an empty one if needed.
    pub fn path(&self) -> Result<PathBuf> {
        self.config.resolve()
    }

    /// Read the full collection. Blank files read as empty.
    pub fn load(&self) -> Result<Vec<Task>> {
        let path = self.path()?;
        let text = fs::read_to_string(&path)?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks: Vec<Task> = serde_json::from_str(&text)
            .map_err(|source| TaskError::CorruptData { path: path.clone(), source })?;
        debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Replace the database contents with `tasks`.
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        let path = self.path()?;
        write_atomic(&path, tasks)?;
        debug!(path = %path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Validate and append a new task, asking `due_source` for a due date when none was given.
    ///
    /// A failed summary does not fail the add; it is returned in [`Added::summary_error`].
    pub fn add(&self, new: NewTask, due_source: &mut dyn DueDateSource) -> Result<Added> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(TaskError::validation("Title must not be empty."));
        }
        let supplied_due = match new.due.as_deref() {
            Some(raw) => Some(
                parse_due_date(raw.trim())
                    .ok_or_else(|| TaskError::validation("Invalid date format for --due. Use YYYY-MM-DD."))?,
            ),
            None => None,
        };

        let mut tasks = self.load()?;
        let due_date = match supplied_due {
            Some(d) => d,
            None => request_due_date(due_source)?,
        };

        let description = new.description.unwrap_or_default();
        let mut summary_error = None;
        let summary = if new.summarize && !description.is_empty() {
            match self.summarizer.summarize(&description) {
                Ok(s) => Some(s),
                Err(e) => {
                    warn!(error = %e, "summarization failed, adding task without summary");
                    summary_error = Some(e);
                    None
                }
            }
        } else {
            None
        };

        let task = Task {
            id: next_id(&tasks),
            title: title.to_string(),
            description,
            due_date: Some(due_date),
            summary,
        };
        tasks.push(task.clone());
        self.save(&tasks)?;
        info!(id = task.id, "added task");
        Ok(Added { task, summary_error })
    }

    /// All tasks grouped by due date.
    pub fn list(&self) -> Result<Vec<DueGroup>> {
        Ok(group_by_due(&self.load()?))
    }

    /// Tasks matching `query` on `field`, in stored order.
    pub fn search(&self, query: &str, field: SearchField, exact: bool) -> Result<Vec<Task>> {
        let tasks = self.load()?;
        Ok(tasks
            .into_iter()
            .filter(|t| matches(t, query, field, exact))
            .collect())
    }

    /// Remove the task with `id`, returning it. Leaves the file untouched on failure.
    pub fn remove(&self, id: u64) -> Result<Task> {
        let mut tasks = self.load()?;
        let hits = tasks.iter().filter(|t| t.id == id).count();
        match hits {
            0 => return Err(TaskError::NotFound(id)),
            1 => {}
            n => {
                return Err(TaskError::validation(format!(
                    "{n} tasks share id {id}; refusing to remove"
                )))
            }
        }
        let idx = tasks.iter().position(|t| t.id == id).ok_or(TaskError::NotFound(id))?;
        let removed = tasks.remove(idx);
        self.save(&tasks)?;
        info!(id, "removed task");
        Ok(removed)
    }
}

/// Write via a sibling temp file and rename so the database is never half-written.
fn write_atomic(path: &Path, tasks: &[Task]) -> Result<()> {
    let data = serde_json::to_string_pretty(tasks)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let tmp = path.with_extension("json.tmp");
    let written = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(data.as_bytes())?;
            f.flush()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Next id to hand out: one more than the largest present, or 1.
pub fn next_id(tasks: &[Task]) -> u64 {
    tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_due_date(s: &str) -> Option<NaiveDate> {
    // chrono alone accepts unpadded fields like 2025-1-5
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .filter(|d| d.format("%Y-%m-%d").to_string() == s)
}

/// Group by ascending due date, ids ascending within a group, undated last.
pub fn group_by_due(tasks: &[Task]) -> Vec<DueGroup> {
    let mut dated: BTreeMap<NaiveDate, Vec<Task>> = BTreeMap::new();
    let mut undated = Vec::new();
    for t in tasks {
        match t.due_date {
            Some(d) => dated.entry(d).or_default().push(t.clone()),
            None => undated.push(t.clone()),
        }
    }

    let mut groups: Vec<DueGroup> = dated
        .into_iter()
        .map(|(d, tasks)| DueGroup { due: Some(d), tasks })
        .collect();
    if !undated.is_empty() {
        groups.push(DueGroup { due: None, tasks: undated });
    }
    for g in groups.iter_mut() {
        g.tasks.sort_by_key(|t| t.id);
    }
    groups
}

/// Whether `task` matches `query` on `field`.
///
/// `id` needs an integer query and ignores `exact`. Exact text matches are
/// case-sensitive except for `all`, which compares lower-cased.
pub fn matches(task: &Task, query: &str, field: SearchField, exact: bool) -> bool {
    let q = query.to_lowercase();
    let text_match = |value: &str| {
        if exact {
            value == query
        } else {
            value.to_lowercase().contains(&q)
        }
    };
    match field {
        SearchField::Id => query.trim().parse::<u64>().map_or(false, |n| n == task.id),
        SearchField::Title => text_match(&task.title),
        SearchField::Description => text_match(&task.description),
        // an undated task never equals a query exactly
        SearchField::DueDate if exact => task.due_date.is_some() && task.due_date_text() == query,
        SearchField::DueDate => text_match(&task.due_date_text()),
        SearchField::All => {
            let combined = format!("{} {}", task.title, task.description).to_lowercase();
            if exact {
                combined == q
            } else {
                combined.contains(&q)
            }
        }
    }
}
