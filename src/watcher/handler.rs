//! Applies declaration file changes to the workspace index

use std::sync::Arc;
use tracing::{debug, info};

use super::debouncer::{ChangeType, FileChange};
use crate::workspace::{UpdateStats, Workspace};

/// Statistics from processing file changes
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub files_added: usize,
    pub files_modified: usize,
    pub files_deleted: usize,
    /// Symbols new to the index
    pub symbols_added: usize,
    /// Symbols re-declared in place or moved between files
    pub symbols_updated: usize,
    pub symbols_removed: usize,
    /// Files that could not be read
    pub errors: usize,
}

impl ProcessingStats {
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.files_added += other.files_added;
        self.files_modified += other.files_modified;
        self.files_deleted += other.files_deleted;
        self.symbols_added += other.symbols_added;
        self.symbols_updated += other.symbols_updated;
        self.symbols_removed += other.symbols_removed;
        self.errors += other.errors;
    }

    pub fn has_changes(&self) -> bool {
        self.files_added > 0 || self.files_modified > 0 || self.files_deleted > 0
    }

    pub fn total_files(&self) -> usize {
        self.files_added + self.files_modified + self.files_deleted
    }

    fn record(&mut self, change_type: ChangeType, update: &UpdateStats) {
        match change_type {
            ChangeType::Created => self.files_added += 1,
            ChangeType::Modified => self.files_modified += 1,
            ChangeType::Deleted => self.files_deleted += 1,
        }
        self.symbols_added += update.symbols_added;
        self.symbols_updated += update.symbols_updated;
        self.symbols_removed += update.symbols_removed;
        self.errors += update.errors;
    }
}

/// Routes each file change to the matching workspace update
pub struct ChangeHandler {
    workspace: Arc<Workspace>,
}

impl ChangeHandler {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }

    /// Process a batch of file changes, in order
    pub async fn process_changes(&self, changes: Vec<FileChange>) -> ProcessingStats {
        let mut stats = ProcessingStats::default();

        for change in changes {
            let update = self.process_single(&change).await;
            stats.record(change.change_type, &update);
        }

        stats
    }

    async fn process_single(&self, change: &FileChange) -> UpdateStats {
        debug!("Processing {} change for {:?}", change.change_type, change.path);

        let id = change.document_id();
        let update = match change.change_type {
            // A create whose delete landed in an earlier batch, or a rename
            // onto an indexed path, must still drop the old symbols
            ChangeType::Created if self.workspace.owns_entries(&id).await => {
                self.workspace.on_document_changed(&id).await
            }
            ChangeType::Created => self.workspace.on_document_created(&id).await,
            ChangeType::Modified => self.workspace.on_document_changed(&id).await,
            ChangeType::Deleted => self.workspace.on_document_deleted(&id).await,
        };

        info!(
            "{} {:?}: +{} -{} symbols",
            change.change_type, change.path, update.symbols_added, update.symbols_removed
        );
        update
    }
}
