use anyhow::Result;

use super::workspace_root;
use crate::symbol::CompletionMode;
use crate::{Config, Workspace};

/// Run the complete command
///
/// # Arguments
///
/// * `partial` - Partially typed PCD name
/// * `mode` - Matching mode; the configured mode when `None`
pub async fn run(partial: &str, mode: Option<CompletionMode>) -> Result<()> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;
    let workspace = Workspace::open(root, &config).await?;

    let mode = mode.unwrap_or_else(|| workspace.completion_mode());
    let candidates = workspace.completions_with_mode(partial, mode).await;

    if candidates.is_empty() {
        eprintln!("No PCDs match '{}' ({} mode).", partial, mode);
        return Ok(());
    }

    for candidate in candidates {
        println!("{}", candidate);
    }

    Ok(())
}
