pub mod complete;
pub mod definition;
pub mod index;
pub mod init;
pub mod serve;
pub mod watch;

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Canonical workspace root for the current directory.
///
/// Watcher events carry absolute paths, so document ids are built from the
/// canonical root to match them.
pub(crate) fn workspace_root() -> Result<PathBuf> {
    let cwd = env::current_dir().with_context(|| "Failed to get current directory")?;
    cwd.canonicalize()
        .with_context(|| format!("Failed to resolve workspace root {:?}", cwd))
}
