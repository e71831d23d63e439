//! Command implementations for the CLI interface.
//!
//! Each handler does its own printing and returns a [`TaskError`] for the
//! caller to turn into an exit status.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::assist::FileProcessor;
use crate::db::{DueGroup, TaskStore};
use crate::error::{Result, TaskError};
use crate::fields::SearchField;
use crate::prompt::DueDateSource;
use crate::task::NewTask;

const DONE_DIR: &str = "done";

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        description: Option<String>,
        /// Due date in YYYY-MM-DD. Prompted for when omitted.
        #[arg(long)]
        due: Option<String>,
        /// Use AI to summarize the description into a short phrase stored as `summary`.
        #[arg(long)]
        summarize: bool,
    },

    /// List tasks grouped by due date.
    List,

    /// Search tasks.
    Search {
        /// Query string.
        #[arg(short, long)]
        query: String,
        /// Field to match against.
        #[arg(short, long, value_enum, default_value_t = SearchField::All)]
        field: SearchField,
        /// Exact match.
        #[arg(long)]
        exact: bool,
    },

    /// Mark a task done and remove it.
    Done {
        /// ID of task to remove.
        id: String,
    },

    /// Process all files in a folder with AI and write outputs to a `done` subfolder.
    AiProcess {
        /// Path to folder containing files to process.
        folder: std::path::PathBuf,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Add a new task, prompting through `due_source` when no due date was given.
pub fn cmd_add(
    store: &TaskStore,
    title: String,
    description: Option<String>,
    due: Option<String>,
    summarize: bool,
    due_source: &mut dyn DueDateSource,
) -> Result<()> {
    let new = NewTask {
        title,
        description,
        due,
        summarize,
    };
    let added = store.add(new, due_source)?;

    if let Some(summary) = &added.task.summary {
        println!("AI summary: {summary}");
    }
    if let Some(e) = &added.summary_error {
        println!("AI summarization failed: {e}");
    }
    let record = serde_json::to_string(&added.task)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    println!("Task added: {record}");
    Ok(())
}

/// Print tasks grouped by due date, undated tasks last.
pub fn cmd_list(store: &TaskStore) -> Result<()> {
    let groups = store.list()?;
    render_groups(&groups, &mut std::io::stdout().lock())?;
    Ok(())
}

/// Write each group as a date header and `- [id] title : text` lines.
///
/// Dated groups end with a blank line; the undated group is headed `No due date:`.
pub fn render_groups(groups: &[DueGroup], out: &mut dyn Write) -> io::Result<()> {
    for group in groups {
        match group.due {
            Some(d) => writeln!(out, "{}", d.format("%Y-%m-%d"))?,
            None => writeln!(out, "No due date:")?,
        }
        for t in &group.tasks {
            writeln!(out, "- [{}] {} : {}", t.id, t.title, t.display_text())?;
        }
        if group.due.is_some() {
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Print matching tasks as a JSON array.
pub fn cmd_search(store: &TaskStore, query: &str, field: SearchField, exact: bool) -> Result<()> {
    let results = store.search(query, field, exact)?;
    if results.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    let out = serde_json::to_string_pretty(&results)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    println!("{out}");
    Ok(())
}

/// Remove a task by id.
pub fn cmd_done(store: &TaskStore, id: &str) -> Result<()> {
    let id: u64 = id
        .trim()
        .parse()
        .map_err(|_| TaskError::validation("Invalid id"))?;
    store.remove(id)?;
    println!("Removed task {id}");
    Ok(())
}

/// Run every file in `folder` through `processor`, writing results to `folder/done/`.
///
/// Stops at the first collaborator failure.
pub fn cmd_ai_process(folder: &Path, processor: &dyn FileProcessor) -> Result<()> {
    if !folder.is_dir() {
        return Err(TaskError::validation(format!("Not a folder: {}", folder.display())));
    }
    let done_dir = folder.join(DONE_DIR);
    fs::create_dir_all(&done_dir)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        println!("No files to process in folder.");
        return Ok(());
    }

    for path in files {
        let Some(name) = path.file_name() else { continue };
        let display_name = name.to_string_lossy();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => {
                println!("Skipping binary or unreadable file: {display_name}");
                continue;
            }
        };
        let out = processor.process_file(&text, &display_name)?;
        let out_path = done_dir.join(name);
        fs::write(&out_path, out)?;
        println!("Wrote: {}", out_path.display());
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::group_by_due;
    use crate::task::Task;
    use chrono::NaiveDate;
    use clap::ValueEnum;

    fn task(id: u64, title: &str, description: &str, due: Option<(i32, u32, u32)>) -> Task {
        Task {
            id,
            title: title.into(),
            description: description.into(),
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            summary: None,
        }
    }

    #[test]
    fn list_renders_headers_lines_and_trailing_undated_group() {
        let mut summarized = task(3, "HW2", "Essay on rivers", Some((2025, 11, 30)));
        summarized.summary = Some("River essay".into());
        let tasks = vec![
            task(1, "HW1", "Chapter 1", Some((2025, 12, 1))),
            task(2, "Someday", "", None),
            summarized,
        ];

        let mut out = Vec::new();
        render_groups(&group_by_due(&tasks), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "2025-11-30\n\
             - [3] HW2 : River essay\n\
             \n\
             2025-12-01\n\
             - [1] HW1 : Chapter 1\n\
             \n\
             No due date:\n\
             - [2] Someday : \n"
        );
    }

    #[test]
    fn date_is_an_alias_for_due_date() {
        assert_eq!(SearchField::from_str("date", true), Ok(SearchField::DueDate));
        assert_eq!(SearchField::from_str("due_date", true), Ok(SearchField::DueDate));
    }

    #[test]
    fn search_accepts_date_field_on_the_command_line() {
        use clap::Parser;
        use crate::cli::Cli;

        let cli = Cli::try_parse_from(["tasks", "search", "-q", "2025-11-30", "-f", "date", "--exact"]).unwrap();
        match cli.command {
            Commands::Search { query, field, exact } => {
                assert_eq!(query, "2025-11-30");
                assert_eq!(field, SearchField::DueDate);
                assert!(exact);
            }
            _ => panic!("expected search"),
        }
    }
}
