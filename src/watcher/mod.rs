//! File system watcher that keeps the PCD index current
//!
//! Debounced notify events for declaration files are turned into
//! [`FileChange`]s and handed to a [`ChangeHandler`].

pub mod debouncer;
pub mod handler;

use anyhow::{Context, Result};
use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebouncedEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{Config, IndexConfig};
use crate::document::FsDocumentSource;
use crate::workspace::Workspace;

pub use debouncer::{coalesce, ChangeType, FileChange};
pub use handler::{ChangeHandler, ProcessingStats};

/// Configuration for the file watcher
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
    /// Declaration file extensions
    pub extensions: Vec<String>,
    /// Path fragments to ignore
    pub ignore_patterns: Vec<String>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl WatcherConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce_ms: config.watcher.debounce_ms,
            extensions: config.index.extensions.clone(),
            ignore_patterns: config.index.ignore_patterns.clone(),
        }
    }
}

/// Watches a workspace root for declaration file changes
pub struct DeclarationWatcher {
    root: PathBuf,
    config: WatcherConfig,
    filter: FsDocumentSource,
    workspace: Arc<Workspace>,
}

impl DeclarationWatcher {
    pub fn new(root: PathBuf, config: WatcherConfig, workspace: Arc<Workspace>) -> Self {
        let filter = FsDocumentSource::new(
            root.clone(),
            &IndexConfig {
                extensions: config.extensions.clone(),
                ignore_patterns: config.ignore_patterns.clone(),
                ..Default::default()
            },
        );

        Self {
            root,
            config,
            filter,
            workspace,
        }
    }

    /// Start watching; runs until the shutdown signal is received.
    ///
    /// Returns the accumulated processing statistics.
    pub async fn run(self, mut shutdown_rx: oneshot::Receiver<()>) -> Result<ProcessingStats> {
        let debounce_duration = Duration::from_millis(self.config.debounce_ms);
        let (tx, mut rx) = mpsc::channel::<Vec<DebouncedEvent>>(100);

        let mut debouncer = new_debouncer(
            debounce_duration,
            None,
            move |result: std::result::Result<Vec<DebouncedEvent>, Vec<notify::Error>>| {
                match result {
                    Ok(events) => {
                        if !events.is_empty() {
                            if let Err(e) = tx.blocking_send(events) {
                                error!("Failed to send debounced events: {}", e);
                            }
                        }
                    }
                    Err(errors) => {
                        for error in errors {
                            error!("Watch error: {}", error);
                        }
                    }
                }
            },
        )
        .with_context(|| "Failed to create file watcher debouncer")?;

        debouncer
            .watch(&self.root, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch directory: {:?}", self.root))?;

        info!("Watching {:?} for declaration changes", self.root);
        debug!("Debounce delay: {}ms", self.config.debounce_ms);

        let handler = ChangeHandler::new(Arc::clone(&self.workspace));
        let mut total_stats = ProcessingStats::default();

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Shutdown signal received, stopping watcher");
                    break;
                }

                Some(events) = rx.recv() => {
                    let changes = self.convert_events(events);
                    if changes.is_empty() {
                        continue;
                    }

                    info!("Processing {} declaration file changes", changes.len());
                    let stats = handler.process_changes(changes).await;
                    if stats.errors > 0 {
                        warn!("{} declaration files could not be read", stats.errors);
                    }
                    total_stats.merge(&stats);
                }
            }
        }

        Ok(total_stats)
    }

    /// Convert debounced notify events into one change per declaration file
    fn convert_events(&self, events: Vec<DebouncedEvent>) -> Vec<FileChange> {
        let mut per_path = Vec::new();

        for event in &events {
            for path in &event.paths {
                if path.is_dir() || !self.filter.matches(path) {
                    continue;
                }

                let Some(change_type) = classify(&event.kind, path) else {
                    continue;
                };

                debug!("Declaration file {:?} -> {}", path, change_type);
                per_path.push((path.clone(), change_type, event.time));
            }
        }

        coalesce(per_path)
    }
}

/// Map a notify event kind to a change type. A modification whose path no
/// longer exists (the source side of a rename) counts as a deletion.
fn classify(kind: &notify::EventKind, path: &Path) -> Option<ChangeType> {
    match kind {
        notify::EventKind::Create(_) => Some(ChangeType::Created),
        notify::EventKind::Modify(_) if !path.exists() => Some(ChangeType::Deleted),
        notify::EventKind::Modify(_) => Some(ChangeType::Modified),
        notify::EventKind::Remove(_) => Some(ChangeType::Deleted),
        _ => None,
    }
}

/// Handle to a watcher running on its own task
pub struct WatcherHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<ProcessingStats>>,
}

impl WatcherHandle {
    /// Spawn `watcher` onto the tokio runtime
    pub fn spawn(watcher: DeclarationWatcher) -> Self {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(watcher.run(shutdown_rx));
        Self {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    /// Request graceful shutdown
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }

    /// Stop the watcher and wait for its final stats
    pub async fn stop(mut self) -> Result<ProcessingStats> {
        self.shutdown();
        self.task.await.with_context(|| "Watcher task panicked")?
    }
}
