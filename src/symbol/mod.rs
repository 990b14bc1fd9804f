//! PCD symbol extraction, indexing and lookup
//!
//! [`extractor`] scans declaration text for `<Namespace>.<PcdName> | ...`
//! lines, [`index`] keeps the symbol -> location table, and [`query`]
//! answers definition and completion lookups against it.

pub mod extractor;
pub mod index;
pub mod query;

use serde::Serialize;
use std::fmt;
use std::ops::Range;

use crate::document::{DocumentId, Position};

pub use extractor::{extract, ExtractorError, PcdExtractor, PCD_DECLARATION_PATTERN};
pub use index::{Collision, MergeOutcome, PcdIndex};
pub use query::{lookup_completions, lookup_definition, word_at, CompletionMode};

/// Where a symbol was declared, as of the last extraction of its document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub document: DocumentId,
    pub start: Position,
    pub end: Position,
    /// Byte offsets of the declaration match in the document text
    pub offsets: Range<usize>,
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document, self.start)
    }
}

/// A symbol name together with its declaration span
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub symbol: String,
    pub span: SourceSpan,
}

impl IndexEntry {
    pub fn document(&self) -> &DocumentId {
        &self.span.document
    }
}
