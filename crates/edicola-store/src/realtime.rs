//! Realtime-database REST client
//!
//! Speaks the realtime-DB REST dialect: `GET {base}/magazines/{addr}.json`
//! returns the document or JSON `null`, `PUT` writes the full document.
//! Every transport or non-2xx failure maps to `StoreUnavailable`; the store
//! holds metadata, not money, and the surface reports it as such.

use crate::ContentStore;
use edicola_types::{Address, ContentDocument, EdicolaError, Result};
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the hosted realtime database
pub struct RealtimeStore {
    base_url: String,
    client: reqwest::Client,
}

impl RealtimeStore {
    /// Create a client for the store rooted at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn document_url(&self, address: &Address) -> String {
        format!("{}/magazines/{}.json", self.base_url, address)
    }

    fn unavailable(context: &str, err: impl std::fmt::Display) -> EdicolaError {
        EdicolaError::StoreUnavailable(format!("{context}: {err}"))
    }
}

#[async_trait::async_trait]
impl ContentStore for RealtimeStore {
    async fn find(&self, address: &Address) -> Result<Option<ContentDocument>> {
        let url = self.document_url(address);
        debug!(%address, "store read");
        let resp = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Self::unavailable("store read", e))?;
        if !resp.status().is_success() {
            return Err(Self::unavailable("store read", resp.status()));
        }
        // the RTDB answers `null` for a missing key
        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Self::unavailable("store decode", e))?;
        if value.is_null() {
            return Ok(None);
        }
        let doc = serde_json::from_value(value)
            .map_err(|e| Self::unavailable("store decode", e))?;
        Ok(Some(doc))
    }

    async fn create_empty(&self, address: &Address) -> Result<()> {
        self.update(address, ContentDocument::empty()).await
    }

    async fn update(&self, address: &Address, doc: ContentDocument) -> Result<()> {
        let url = self.document_url(address);
        debug!(%address, "store write");
        let resp = self
            .client
            .put(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&doc)
            .send()
            .await
            .map_err(|e| Self::unavailable("store write", e))?;
        if !resp.status().is_success() {
            return Err(Self::unavailable("store write", resp.status()));
        }
        Ok(())
    }
}
