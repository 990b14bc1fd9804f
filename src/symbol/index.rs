//! In-memory PCD symbol table

use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use super::{IndexEntry, SourceSpan};
use crate::document::DocumentId;

/// Default number of collisions remembered
pub const DEFAULT_COLLISION_LOG_LIMIT: usize = 256;

/// A symbol declared by one document being overwritten by another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub symbol: String,
    pub previous: SourceSpan,
    pub replacement: SourceSpan,
}

/// Counts from merging one document's extraction into the index
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Symbols that were not in the index before
    pub added: usize,
    /// Symbols whose entry was replaced
    pub replaced: usize,
}

/// Symbol name -> declaration table
///
/// Names are unique across documents: merging a symbol that is already
/// present replaces its entry, whichever document owned it. Replacements
/// that move a symbol between documents are kept in a bounded collision log.
#[derive(Debug)]
pub struct PcdIndex {
    by_name: HashMap<String, IndexEntry>,
    collisions: VecDeque<Collision>,
    collision_limit: usize,
}

impl PcdIndex {
    pub fn new() -> Self {
        Self::with_collision_limit(DEFAULT_COLLISION_LOG_LIMIT)
    }

    pub fn with_collision_limit(collision_limit: usize) -> Self {
        Self {
            by_name: HashMap::new(),
            collisions: VecDeque::new(),
            collision_limit,
        }
    }

    /// Merge one document's extraction result, last write wins per symbol
    pub fn merge(
        &mut self,
        document: &DocumentId,
        symbols: HashMap<String, SourceSpan>,
    ) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();

        for (symbol, span) in symbols {
            let entry = IndexEntry {
                symbol: symbol.clone(),
                span,
            };

            match self.by_name.insert(symbol, entry) {
                None => outcome.added += 1,
                Some(previous) => {
                    outcome.replaced += 1;
                    if previous.document() != document {
                        self.record_collision(previous);
                    }
                }
            }
        }

        outcome
    }

    /// Drop entries owned by `document` whose symbol is not in `keep`.
    ///
    /// Returns the number of entries removed.
    pub fn retain_for_document(
        &mut self,
        document: &DocumentId,
        keep: &HashMap<String, SourceSpan>,
    ) -> usize {
        let before = self.by_name.len();
        self.by_name
            .retain(|name, entry| entry.document() != document || keep.contains_key(name));
        before - self.by_name.len()
    }

    /// Drop every entry owned by `document`, returning how many were removed
    pub fn remove_document(&mut self, document: &DocumentId) -> usize {
        let before = self.by_name.len();
        self.by_name.retain(|_, entry| entry.document() != document);
        before - self.by_name.len()
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, symbol: &str) -> Option<&IndexEntry> {
        self.by_name.get(symbol)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.by_name.contains_key(symbol)
    }

    /// All symbol names, in no particular order
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }

    /// All entries sorted by symbol name
    pub fn entries(&self) -> Vec<&IndexEntry> {
        let mut entries: Vec<_> = self.by_name.values().collect();
        entries.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        entries
    }

    /// Entries owned by one document, sorted by position
    pub fn entries_in_document(&self, document: &DocumentId) -> Vec<&IndexEntry> {
        let mut entries: Vec<_> = self
            .by_name
            .values()
            .filter(|entry| entry.document() == document)
            .collect();
        entries.sort_by_key(|entry| entry.span.start);
        entries
    }

    /// Whether `document` owns at least one entry
    pub fn owns(&self, document: &DocumentId) -> bool {
        self.by_name.values().any(|entry| entry.document() == document)
    }

    /// Documents that own at least one entry, sorted
    pub fn documents(&self) -> Vec<&DocumentId> {
        let mut documents: Vec<_> = self.by_name.values().map(IndexEntry::document).collect();
        documents.sort();
        documents.dedup();
        documents
    }

    /// Recorded cross-document overwrites, oldest first
    pub fn collisions(&self) -> impl Iterator<Item = &Collision> {
        self.collisions.iter()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Clear the index and the collision log
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.collisions.clear();
    }

    fn record_collision(&mut self, previous: IndexEntry) {
        let Some(current) = self.by_name.get(&previous.symbol) else {
            return;
        };

        debug!(
            "{} redeclared: {} replaces {}",
            previous.symbol, current.span, previous.span
        );

        if self.collision_limit == 0 {
            return;
        }
        if self.collisions.len() == self.collision_limit {
            self.collisions.pop_front();
        }
        self.collisions.push_back(Collision {
            replacement: current.span.clone(),
            symbol: previous.symbol,
            previous: previous.span,
        });
    }
}

impl Default for PcdIndex {
    fn default() -> Self {
        Self::new()
    }
}
