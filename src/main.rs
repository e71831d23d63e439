use std::path::PathBuf;

use clap::Parser;

use task_tracker::assist::{client_from_env, FileProcessor, Summarizer};
use task_tracker::cli::Cli;
use task_tracker::cmd::*;
use task_tracker::logging::init_logging;
use task_tracker::prompt::LinePrompt;
use task_tracker::{ResolverConfig, Result, TaskStore};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let db = cli.db;
    match cli.command {
        Commands::Add { title, description, due, summarize } => {
            let mut store = open_store(db)?;
            if summarize {
                let summarizer: Box<dyn Summarizer> = match client_from_env() {
                    Ok(client) => Box::new(client),
                    Err(unavailable) => Box::new(unavailable),
                };
                store = store.with_summarizer(summarizer);
            }
            cmd_add(&store, title, description, due, summarize, &mut LinePrompt::console())
        }
        Commands::List => cmd_list(&open_store(db)?),
        Commands::Search { query, field, exact } => cmd_search(&open_store(db)?, &query, field, exact),
        Commands::Done { id } => cmd_done(&open_store(db)?, &id),
        Commands::AiProcess { folder } => {
            let processor: Box<dyn FileProcessor> = match client_from_env() {
                Ok(client) => Box::new(client),
                Err(unavailable) => Box::new(unavailable),
            };
            cmd_ai_process(&folder, processor.as_ref())
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Store over `--db`, or the standard locations under the working directory and `$HOME`.
fn open_store(db: Option<PathBuf>) -> Result<TaskStore> {
    let resolver = match db {
        Some(path) => ResolverConfig::explicit(path),
        None => {
            let cwd = std::env::current_dir()?;
            let home = std::env::var_os("HOME").map(PathBuf::from);
            ResolverConfig::standard(&cwd, home.as_deref())
        }
    };
    Ok(TaskStore::new(resolver))
}
