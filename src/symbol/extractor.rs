//! Declaration scanning
//!
//! A PCD declaration in a `.dec` file looks like
//!
//! ```text
//! gEfiMdePkgTokenSpaceGuid.PcdMaximumUnicodeStringLength|1000000|UINT32|0x00000001
//! ```
//!
//! Only the local name (`PcdMaximumUnicodeStringLength`) is indexed; the
//! token space prefix is dropped.

use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::trace;

use super::SourceSpan;
use crate::document::{Document, DocumentId, LineIndex, Position};

/// Default declaration pattern. Group 1 captures the PCD name; the whole
/// match runs from the token space name to the last word boundary of the
/// line. Word boundaries are ASCII-only, so non-ASCII letters count as
/// separators.
pub const PCD_DECLARATION_PATTERN: &str =
    r"(?-u:\b)[A-Za-z0-9_]+\.(Pcd[A-Za-z0-9_]+) *\|.+(?-u:\b)";

/// Errors building an extractor from a custom pattern
#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Invalid declaration pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Declaration pattern '{0}' has no capture group for the symbol name")]
    MissingCapture(String),
}

/// Extracts PCD declarations from document text
#[derive(Debug, Clone)]
pub struct PcdExtractor {
    pattern: Regex,
}

impl PcdExtractor {
    /// Build an extractor from a custom pattern. Capture group 1 must hold
    /// the symbol name.
    pub fn with_pattern(pattern: &str) -> Result<Self, ExtractorError> {
        let compiled = Regex::new(pattern).map_err(|source| ExtractorError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        if compiled.captures_len() < 2 {
            return Err(ExtractorError::MissingCapture(pattern.to_string()));
        }

        Ok(Self { pattern: compiled })
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Extract all declarations from a document that has already been read
    pub fn extract_document(&self, document: &Document) -> HashMap<String, SourceSpan> {
        scan(document.text(), document.id(), &self.pattern, |offset| {
            document.position_at(offset)
        })
    }

    /// Extract all declarations from raw text
    pub fn extract(&self, text: &str, document: &DocumentId) -> HashMap<String, SourceSpan> {
        extract(text, document, &self.pattern)
    }
}

impl Default for PcdExtractor {
    fn default() -> Self {
        Self {
            pattern: Regex::new(PCD_DECLARATION_PATTERN)
                .expect("built-in declaration pattern is valid"),
        }
    }
}

/// Scan `text` for every non-overlapping match of `pattern`.
///
/// Capture group 1 of each match is the symbol; the whole match is its span.
/// A symbol declared more than once keeps its last match. Text without
/// matches, or a pattern without group 1, yields an empty map.
pub fn extract(text: &str, document: &DocumentId, pattern: &Regex) -> HashMap<String, SourceSpan> {
    let lines = LineIndex::new(text);
    scan(text, document, pattern, |offset| lines.position_at(text, offset))
}

fn scan(
    text: &str,
    document: &DocumentId,
    pattern: &Regex,
    position_at: impl Fn(usize) -> Position,
) -> HashMap<String, SourceSpan> {
    let mut symbols = HashMap::new();

    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if name.as_str().is_empty() {
            continue;
        }

        let span = SourceSpan {
            document: document.clone(),
            start: position_at(whole.start()),
            end: position_at(whole.end()),
            offsets: whole.range(),
        };
        symbols.insert(name.as_str().to_string(), span);
    }

    trace!("Extracted {} declarations from {}", symbols.len(), document);
    symbols
}
