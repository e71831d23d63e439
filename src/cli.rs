use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Personal task tracker backed by a single JSON file.
/// Storage defaults to ./data/tasks.json, ./tasks.json or ~/.tasks/tasks.json,
/// or a path passed via --db.
#[derive(Parser)]
#[command(name = "tasks", version, about = "Personal task tracker CLI")]
pub struct Cli {
    /// Path to the JSON database file.
    #[arg(long, global = true, env = "TASKS_DB")]
    pub db: Option<PathBuf>,

    /// Log debug diagnostics to stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
