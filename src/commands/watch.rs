//! Watch command implementation
//!
//! Builds the index, then keeps it current from file-system events.

use anyhow::Result;
use tokio::signal;
use tracing::info;

use super::workspace_root;
use crate::watcher::{DeclarationWatcher, WatcherConfig, WatcherHandle};
use crate::{Config, Workspace};

/// Run the watch command
///
/// # Arguments
/// * `debounce_ms` - Debounce delay override in milliseconds
pub async fn run(debounce_ms: Option<u64>) -> Result<()> {
    let root = workspace_root()?;
    let config = Config::load(&root)?;

    let mut watcher_config = WatcherConfig::from_config(&config);
    if let Some(debounce_ms) = debounce_ms {
        watcher_config.debounce_ms = debounce_ms;
    }

    let workspace = Workspace::open(root.clone(), &config).await?;

    println!("Starting watch mode...");
    println!("Watching directory: {:?}", root);
    println!("Debounce delay: {}ms", watcher_config.debounce_ms);
    println!("Extensions: {:?}", watcher_config.extensions);
    println!(
        "Indexed {} PCDs from {} declaration files",
        workspace.len().await,
        workspace.document_count().await
    );
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    let handle = WatcherHandle::spawn(DeclarationWatcher::new(root, watcher_config, workspace));

    signal::ctrl_c().await?;

    println!();
    println!("Shutting down...");

    let stats = handle.stop().await?;

    println!();
    if !stats.has_changes() {
        println!("Watch session complete, no declaration files changed.");
        info!("Watch session ended");
        return Ok(());
    }

    println!("Watch session complete!");
    println!("----------------------------------------");
    println!("  Files added:     {}", stats.files_added);
    println!("  Files modified:  {}", stats.files_modified);
    println!("  Files deleted:   {}", stats.files_deleted);
    println!("  Symbols added:   {}", stats.symbols_added);
    println!("  Symbols updated: {}", stats.symbols_updated);
    println!("  Symbols removed: {}", stats.symbols_removed);
    if stats.errors > 0 {
        println!("  Errors:          {}", stats.errors);
    }
    println!("----------------------------------------");

    info!("Watch session ended");

    Ok(())
}
