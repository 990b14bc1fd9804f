use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{Document, DocumentError, DocumentId, DocumentSource};

/// Declaration documents held in memory, enumerated in path order
///
/// Useful for embedding the index behind an editor's own buffers and for
/// tests that need to edit documents between index updates.
#[derive(Debug, Default)]
pub struct MemoryDocumentSource {
    documents: RwLock<BTreeMap<DocumentId, String>>,
}

impl MemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a document's text
    pub async fn insert(&self, id: impl Into<DocumentId>, text: impl Into<String>) {
        self.documents.write().await.insert(id.into(), text.into());
    }

    /// Remove a document, returning whether it existed
    pub async fn remove(&self, id: &DocumentId) -> bool {
        self.documents.write().await.remove(id).is_some()
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn enumerate(&self) -> Vec<DocumentId> {
        self.documents.read().await.keys().cloned().collect()
    }

    async fn read(&self, id: &DocumentId) -> Result<Document, DocumentError> {
        self.documents
            .read()
            .await
            .get(id)
            .map(|text| Document::new(id.clone(), text.clone()))
            .ok_or_else(|| DocumentError::NotFound(id.clone()))
    }
}
