//! In-memory content store
//!
//! Same contract as the hosted store, backed by a map. Used by tests and
//! demos; also handy for running the CLI against a chain with no store
//! configured.

use crate::ContentStore;
use edicola_types::{Address, ContentDocument, Result};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Map-backed store implementing the same trait as the hosted one
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Address, ContentDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held, for assertions
    pub async fn len(&self) -> usize {
        self.documents.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ContentStore for MemoryStore {
    async fn find(&self, address: &Address) -> Result<Option<ContentDocument>> {
        Ok(self.documents.lock().await.get(address).cloned())
    }

    async fn create_empty(&self, address: &Address) -> Result<()> {
        self.documents
            .lock()
            .await
            .insert(address.clone(), ContentDocument::empty());
        Ok(())
    }

    async fn update(&self, address: &Address, doc: ContentDocument) -> Result<()> {
        self.documents.lock().await.insert(address.clone(), doc);
        Ok(())
    }
}
