//! MCP server command implementation.
//!
//! Builds the index, optionally keeps it current with the watcher, and
//! serves lookups over stdio.

use anyhow::Result;
use tracing::info;

use super::workspace_root;
use crate::mcp::PcdServer;
use crate::watcher::{DeclarationWatcher, WatcherConfig, WatcherHandle};
use crate::{Config, Workspace};

/// Run the MCP server command
///
/// # Arguments
///
/// * `no_watch` - Serve a static index built once at startup
pub async fn run(no_watch: bool) -> Result<()> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;

    let workspace = Workspace::open(root.clone(), &config).await?;
    info!("Symbol index ready with {} PCDs", workspace.len().await);

    let watcher = if no_watch {
        None
    } else {
        let watcher_config = WatcherConfig::from_config(&config);
        Some(WatcherHandle::spawn(DeclarationWatcher::new(
            root.clone(),
            watcher_config,
            workspace.clone(),
        )))
    };

    info!("Starting MCP server with stdio transport");
    let server = PcdServer::new(workspace, root);
    let result = server.run().await;

    if let Some(watcher) = watcher {
        let stats = watcher.stop().await?;
        if stats.has_changes() {
            info!(
                "Watcher stopped after {} file changes ({} symbols added, {} removed)",
                stats.total_files(),
                stats.symbols_added,
                stats.symbols_removed
            );
        } else {
            info!("Watcher stopped, no declaration files changed");
        }
    }

    result
}
