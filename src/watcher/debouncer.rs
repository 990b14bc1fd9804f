//! Declaration file change events
//!
//! Raw notify events are debounced by `notify-debouncer-full`; this module
//! folds one batch of them into a single change per file.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use crate::document::DocumentId;

/// Kinds of declaration file change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Created,
    Modified,
    Deleted,
}

impl ChangeType {
    /// The net change of `self` followed by `next` on the same file.
    ///
    /// A file removed and then created again (editors saving through a
    /// temporary file, `git checkout`) is a modification: its old symbols
    /// must be dropped, not merged with the new ones.
    pub fn then(self, next: ChangeType) -> ChangeType {
        match (self, next) {
            (_, ChangeType::Deleted) => ChangeType::Deleted,
            (ChangeType::Created, ChangeType::Modified) => ChangeType::Created,
            (ChangeType::Created, ChangeType::Created) => ChangeType::Created,
            (ChangeType::Deleted, _) | (ChangeType::Modified, _) => ChangeType::Modified,
        }
    }
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeType::Created => write!(f, "created"),
            ChangeType::Modified => write!(f, "modified"),
            ChangeType::Deleted => write!(f, "deleted"),
        }
    }
}

/// A change to one declaration file
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub change_type: ChangeType,
    /// When the last event folded into this change happened
    pub timestamp: Instant,
}

impl FileChange {
    pub fn new(path: PathBuf, change_type: ChangeType) -> Self {
        Self::at(path, change_type, Instant::now())
    }

    pub fn at(path: PathBuf, change_type: ChangeType, timestamp: Instant) -> Self {
        Self {
            path,
            change_type,
            timestamp,
        }
    }

    pub fn created(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Created)
    }

    pub fn modified(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Modified)
    }

    pub fn deleted(path: PathBuf) -> Self {
        Self::new(path, ChangeType::Deleted)
    }

    /// The index document this change applies to
    pub fn document_id(&self) -> DocumentId {
        DocumentId::new(self.path.clone())
    }

    fn absorb(&mut self, change_type: ChangeType, timestamp: Instant) {
        self.change_type = self.change_type.then(change_type);
        self.timestamp = self.timestamp.max(timestamp);
    }
}

/// Fold per-path events into one change per path.
///
/// Events are applied in timestamp order (ties keep their input order).
/// The result is ordered by each file's last event, then by path.
pub fn coalesce(mut events: Vec<(PathBuf, ChangeType, Instant)>) -> Vec<FileChange> {
    events.sort_by_key(|(_, _, timestamp)| *timestamp);

    let mut changes: HashMap<PathBuf, FileChange> = HashMap::new();
    for (path, change_type, timestamp) in events {
        match changes.get_mut(&path) {
            Some(change) => change.absorb(change_type, timestamp),
            None => {
                changes.insert(path.clone(), FileChange::at(path, change_type, timestamp));
            }
        }
    }

    let mut changes: Vec<_> = changes.into_values().collect();
    changes.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.path.cmp(&b.path)));
    changes
}
