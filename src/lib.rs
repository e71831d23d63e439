//! # tasks - Personal Task Tracker
//!
//! A small command-line task tracker that keeps every task in one JSON file.
//!
//! ## Key Features
//!
//! - **Due-date grouping**: `tasks list` groups by due date, earliest first, undated last
//! - **Field search**: substring or exact search on id, title, description, due date or all text
//! - **Optional AI summaries**: `--summarize` stores a short summary of the description
//! - **Plain JSON storage**: a bare array of task objects, rewritten in full on every change
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task (prompts for a due date when --due is omitted)
//! tasks add "HW1" "Chapter 1" --due 2025-11-30
//!
//! # List tasks
//! tasks list
//!
//! # Search titles
//! tasks search -q home -f title
//!
//! # Finish a task
//! tasks done 1
//! ```
//!
//! Data lives in `./data/tasks.json` unless an existing `./tasks.json` or
//! `~/.tasks/tasks.json` is found first, or `--db`/`TASKS_DB` names a file.

pub mod assist;
pub mod cli;
pub mod cmd;
pub mod db;
pub mod error;
pub mod fields;
pub mod logging;
pub mod prompt;
pub mod resolver;
pub mod task;

pub use db::{matches, Added, DueGroup, TaskStore};
pub use error::{Result, TaskError};
pub use fields::SearchField;
pub use resolver::ResolverConfig;
pub use task::{NewTask, Task};
