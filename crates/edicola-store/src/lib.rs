//! Edicola Store - off-chain content metadata client
//!
//! The document store keys one `{cover, content, summary}` document per
//! magazine address. It supports three operations: point read, point create
//! (all-empty), and point update. The store is the sole source of truth for
//! those three fields; everything else lives on-chain.
//!
//! A missing document is `Ok(None)`, never an error: a released magazine
//! whose document has not landed yet simply reads as "not yet available".

pub mod memory;
pub mod realtime;

pub use memory::MemoryStore;
pub use realtime::RealtimeStore;

use edicola_types::{Address, ContentDocument, Result};

/// Seam over the document store so the reconciler can run against the real
/// realtime database or an in-memory fixture.
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Point read by magazine address; `None` when no document exists
    async fn find(&self, address: &Address) -> Result<Option<ContentDocument>>;

    /// Create the all-empty document for a newly created magazine
    async fn create_empty(&self, address: &Address) -> Result<()>;

    /// Replace the document for a released magazine
    async fn update(&self, address: &Address, doc: ContentDocument) -> Result<()>;
}
