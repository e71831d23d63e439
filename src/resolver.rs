//! Location of the JSON task database.
//!
//! The resolver walks a fixed, ordered list of candidate paths. The first
//! entry is the canonical location: it wins when present, and it is where an
//! empty database is created when no candidate exists.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

/// Directory under `$HOME` holding the per-user fallback database.
pub const HOME_DIR_NAME: &str = ".tasks";
pub const DB_FILE_NAME: &str = "tasks.json";

/// Ordered candidate paths for the task database.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    candidates: Vec<PathBuf>,
}

impl ResolverConfig {
    /// A single explicit database path, e.g. from `--db`.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        ResolverConfig {
            candidates: vec![path.into()],
        }
    }

    /// The default search order rooted at `cwd`, with an optional home fallback.
    pub fn standard(cwd: &Path, home: Option<&Path>) -> Self {
        let mut candidates = vec![
            cwd.join("data").join(DB_FILE_NAME),
            cwd.join(DB_FILE_NAME),
        ];
        if let Some(home) = home {
            candidates.push(home.join(HOME_DIR_NAME).join(DB_FILE_NAME));
        }
        ResolverConfig { candidates }
    }

    pub fn canonical(&self) -> &Path {
        &self.candidates[0]
    }

    /// Pick the database file, creating an empty one at the canonical path if needed.
    ///
    /// The returned path always names an existing file.
    pub fn resolve(&self) -> Result<PathBuf> {
        if let Some(found) = self.candidates.iter().find(|p| p.is_file()) {
            debug!(path = %found.display(), "using existing task database");
            return Ok(found.clone());
        }

        let canonical = self.canonical();
        if let Some(parent) = canonical.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(canonical, "[]")?;
        debug!(path = %canonical.display(), "initialized empty task database");
        Ok(canonical.to_path_buf())
    }
}
