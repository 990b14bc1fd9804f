//! Declaration documents and the sources that provide them
//!
//! The index never touches the file system directly. It asks a
//! [`DocumentSource`] to enumerate declaration documents and to read one
//! document's text; the returned [`Document`] carries a line index so match
//! offsets can be turned into editor positions.

pub mod fs;
pub mod kind;
pub mod line_index;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use fs::FsDocumentSource;
pub use kind::DocumentKind;
pub use line_index::{LineIndex, Position};
pub use memory::MemoryDocumentSource;

/// Identifier of a declaration document (its path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(PathBuf);

impl DocumentId {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<PathBuf> for DocumentId {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl From<&Path> for DocumentId {
    fn from(path: &Path) -> Self {
        Self(path.to_path_buf())
    }
}

impl From<String> for DocumentId {
    fn from(path: String) -> Self {
        Self(PathBuf::from(path))
    }
}

impl From<&str> for DocumentId {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

/// Errors raised while reading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document is not known to the source.
    #[error("Document not found: {0}")]
    NotFound(DocumentId),

    /// Reading the document failed.
    #[error("Failed to read {id}: {source}")]
    Io {
        id: DocumentId,
        #[source]
        source: std::io::Error,
    },
}

/// Full text of a document as it was when read
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    text: String,
    lines: LineIndex,
}

impl Document {
    pub fn new(id: DocumentId, text: String) -> Self {
        let lines = LineIndex::new(&text);
        Self { id, text, lines }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert a byte offset into a line/character position
    pub fn position_at(&self, offset: usize) -> Position {
        self.lines.position_at(&self.text, offset)
    }

    /// Convert a line/character position into a byte offset
    pub fn offset_at(&self, position: Position) -> usize {
        self.lines.offset_at(&self.text, position)
    }
}

/// Provider of declaration documents
///
/// Implementations decide which documents count as declaration sources
/// (typically by file suffix). `enumerate` never fails; unreadable entries
/// are simply left out. `read` reports failures, which the index treats as
/// an empty document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// List every declaration document currently available.
    async fn enumerate(&self) -> Vec<DocumentId>;

    /// Read the current full text of a document.
    async fn read(&self, id: &DocumentId) -> Result<Document, DocumentError>;
}
