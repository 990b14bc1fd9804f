//! The PCD index of one open workspace
//!
//! A [`Workspace`] is created when a workspace opens and dropped when it
//! closes. It owns the symbol table, reads declaration documents through a
//! [`DocumentSource`], and applies file-system events to the table.
//!
//! Document reads never happen while the table is locked, so queries are not
//! held up by I/O. Updates to the same document are serialized; a failed
//! read counts as an empty document.

mod single_flight;

use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{Config, IndexConfig};
use crate::document::{Document, DocumentId, DocumentSource, FsDocumentSource, Position};
use crate::symbol::{
    query, Collision, CompletionMode, IndexEntry, PcdExtractor, PcdIndex, SourceSpan,
};

pub use single_flight::DocumentLocks;

/// Counts from one or more index updates
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateStats {
    /// Documents read (or removed)
    pub documents: usize,
    /// Symbols new to the index
    pub symbols_added: usize,
    /// Symbols whose entry was replaced
    pub symbols_updated: usize,
    /// Symbols removed from the index
    pub symbols_removed: usize,
    /// Documents that could not be read
    pub errors: usize,
}

impl UpdateStats {
    pub fn merge(&mut self, other: &UpdateStats) {
        self.documents += other.documents;
        self.symbols_added += other.symbols_added;
        self.symbols_updated += other.symbols_updated;
        self.symbols_removed += other.symbols_removed;
        self.errors += other.errors;
    }
}

/// Index settings derived from configuration
#[derive(Debug, Clone)]
pub struct WorkspaceOptions {
    pub extractor: PcdExtractor,
    pub completion_mode: CompletionMode,
    pub max_concurrent_reads: usize,
    pub collision_log_limit: usize,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        let config = IndexConfig::default();
        Self {
            extractor: PcdExtractor::default(),
            completion_mode: config.completion_mode,
            max_concurrent_reads: config.max_concurrent_reads,
            collision_log_limit: config.collision_log_limit,
        }
    }
}

impl WorkspaceOptions {
    pub fn from_config(config: &IndexConfig) -> Result<Self> {
        let extractor = match &config.declaration_pattern {
            Some(pattern) => PcdExtractor::with_pattern(pattern)?,
            None => PcdExtractor::default(),
        };

        Ok(Self {
            extractor,
            completion_mode: config.completion_mode,
            max_concurrent_reads: config.max_concurrent_reads.max(1),
            collision_log_limit: config.collision_log_limit,
        })
    }
}

/// PCD symbol index kept in step with a set of declaration documents
pub struct Workspace {
    source: Arc<dyn DocumentSource>,
    extractor: PcdExtractor,
    index: RwLock<PcdIndex>,
    locks: DocumentLocks,
    completion_mode: CompletionMode,
    max_concurrent_reads: usize,
}

impl Workspace {
    /// Create an empty workspace over `source`. Call [`Workspace::build`] to
    /// populate it.
    pub fn new(source: Arc<dyn DocumentSource>, options: WorkspaceOptions) -> Self {
        Self {
            source,
            extractor: options.extractor,
            index: RwLock::new(PcdIndex::with_collision_limit(options.collision_log_limit)),
            locks: DocumentLocks::new(),
            completion_mode: options.completion_mode,
            max_concurrent_reads: options.max_concurrent_reads.max(1),
        }
    }

    /// Open the declaration files under `root` and build the index
    pub async fn open(root: PathBuf, config: &Config) -> Result<Arc<Self>> {
        let source = Arc::new(FsDocumentSource::new(root, &config.index));
        let workspace = Arc::new(Self::new(source, WorkspaceOptions::from_config(&config.index)?));
        workspace.build().await;
        Ok(workspace)
    }

    pub fn completion_mode(&self) -> CompletionMode {
        self.completion_mode
    }

    /// Extract every declaration document and merge the results.
    ///
    /// Reads run concurrently, merges happen in enumeration order, so for a
    /// symbol declared in several documents the last one enumerated wins.
    pub async fn build(&self) -> UpdateStats {
        let ids = self.source.enumerate().await;
        info!("Indexing {} declaration files", ids.len());

        let mut stats = UpdateStats::default();
        let mut reads = stream::iter(ids)
            .map(|id| async move {
                let symbols = self.extract(&id).await;
                (id, symbols)
            })
            .buffered(self.max_concurrent_reads);

        while let Some((id, symbols)) = reads.next().await {
            stats.documents += 1;
            let Some(symbols) = symbols else {
                stats.errors += 1;
                continue;
            };

            let outcome = self.index.write().await.merge(&id, symbols);
            stats.symbols_added += outcome.added;
            stats.symbols_updated += outcome.replaced;
        }

        info!(
            "Indexed {} symbols from {} files ({} unreadable)",
            self.index.read().await.len(),
            stats.documents,
            stats.errors
        );
        stats
    }

    /// Drop everything and build from scratch
    pub async fn rebuild(&self) -> UpdateStats {
        self.index.write().await.clear();
        self.build().await
    }

    /// Re-extract a changed document. Its symbols that disappeared are
    /// removed; the rest are merged.
    pub async fn on_document_changed(&self, id: &DocumentId) -> UpdateStats {
        let _guard = self.locks.acquire(id).await;
        let mut stats = UpdateStats {
            documents: 1,
            ..Default::default()
        };

        let symbols = self.extract(id).await.unwrap_or_else(|| {
            stats.errors += 1;
            HashMap::new()
        });

        let mut index = self.index.write().await;
        stats.symbols_removed = index.retain_for_document(id, &symbols);
        let outcome = index.merge(id, symbols);
        stats.symbols_added = outcome.added;
        stats.symbols_updated = outcome.replaced;

        debug!(
            "Changed {}: +{} ~{} -{}",
            id, stats.symbols_added, stats.symbols_updated, stats.symbols_removed
        );
        stats
    }

    /// Extract a new document and merge its symbols
    pub async fn on_document_created(&self, id: &DocumentId) -> UpdateStats {
        let _guard = self.locks.acquire(id).await;
        let mut stats = UpdateStats {
            documents: 1,
            ..Default::default()
        };

        let Some(symbols) = self.extract(id).await else {
            stats.errors += 1;
            return stats;
        };

        let outcome = self.index.write().await.merge(id, symbols);
        stats.symbols_added = outcome.added;
        stats.symbols_updated = outcome.replaced;

        debug!("Created {}: +{} ~{}", id, stats.symbols_added, stats.symbols_updated);
        stats
    }

    /// Remove every symbol owned by a deleted document
    pub async fn on_document_deleted(&self, id: &DocumentId) -> UpdateStats {
        let guard = self.locks.acquire(id).await;
        let removed = self.index.write().await.remove_document(id);
        drop(guard);
        self.locks.prune();

        debug!("Deleted {}: -{}", id, removed);
        UpdateStats {
            documents: 1,
            symbols_removed: removed,
            ..Default::default()
        }
    }

    /// Declaration of the PCD named in `text`
    pub async fn definition(&self, text: &str) -> Option<SourceSpan> {
        query::lookup_definition(&*self.index.read().await, text)
    }

    /// Declaration of the PCD under the cursor in a consumer document
    pub async fn definition_at(&self, document: &Document, position: Position) -> Option<SourceSpan> {
        let word = query::word_at(document, position)?;
        self.definition(word).await
    }

    /// Completions for `text` using the configured mode
    pub async fn completions(&self, text: &str) -> Vec<String> {
        self.completions_with_mode(text, self.completion_mode).await
    }

    pub async fn completions_with_mode(&self, text: &str, mode: CompletionMode) -> Vec<String> {
        query::lookup_completions(&*self.index.read().await, text, mode)
    }

    /// Snapshot of all entries, sorted by symbol
    pub async fn entries(&self) -> Vec<IndexEntry> {
        self.index
            .read()
            .await
            .entries()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Snapshot of one document's entries, in declaration order
    pub async fn entries_in_document(&self, id: &DocumentId) -> Vec<IndexEntry> {
        self.index
            .read()
            .await
            .entries_in_document(id)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Whether any indexed symbol is currently owned by `id`
    pub async fn owns_entries(&self, id: &DocumentId) -> bool {
        self.index.read().await.owns(id)
    }

    /// Recorded cross-document redeclarations, oldest first
    pub async fn collisions(&self) -> Vec<Collision> {
        self.index.read().await.collisions().cloned().collect()
    }

    pub async fn document_count(&self) -> usize {
        self.index.read().await.documents().len()
    }

    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }

    /// Read and extract one document; `None` if it could not be read
    async fn extract(&self, id: &DocumentId) -> Option<HashMap<String, SourceSpan>> {
        match self.source.read(id).await {
            Ok(document) => Some(self.extractor.extract_document(&document)),
            Err(e) => {
                warn!("Skipping declarations of {}: {}", id, e);
                None
            }
        }
    }
}
