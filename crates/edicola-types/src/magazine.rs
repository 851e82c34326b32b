//! Magazine records
//!
//! The on-chain side of a record is `(address, title, release_date)`; the
//! off-chain side is `(cover, content, summary)` held in the document store.
//! A record with `release_date == 0` is unreleased and must carry empty
//! content fields.

use crate::Address;
use serde::{Deserialize, Serialize};

/// Off-chain content fields for one magazine, keyed by its address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentDocument {
    pub cover: String,
    pub content: String,
    pub summary: String,
}

impl ContentDocument {
    /// The all-empty document written when a magazine is created
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every field is still unpopulated
    pub fn is_empty(&self) -> bool {
        self.cover.is_empty() && self.content.is_empty() && self.summary.is_empty()
    }
}

/// A magazine as the catalog sees it: on-chain fields merged with whatever
/// off-chain content has been fetched so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagazineRecord {
    /// On-chain identity, the primary key everywhere
    pub address: Address,
    /// Set once at creation, immutable on-chain
    pub title: String,
    /// Unix epoch milliseconds; 0 means not yet released
    pub release_date: u64,
    /// Cover pointer, empty until released and merged
    #[serde(default)]
    pub cover: String,
    /// Content pointer, empty until released and merged
    #[serde(default)]
    pub content: String,
    /// Summary text, empty until released and merged
    #[serde(default)]
    pub summary: String,
}

impl MagazineRecord {
    /// A record fresh off the chain, content fields not yet merged
    pub fn on_chain(address: Address, title: impl Into<String>, release_date: u64) -> Self {
        Self {
            address,
            title: title.into(),
            release_date,
            cover: String::new(),
            content: String::new(),
            summary: String::new(),
        }
    }

    /// Whether the magazine has been released
    pub fn is_released(&self) -> bool {
        self.release_date > 0
    }

    /// Fill the content fields from a store document
    pub fn merge_content(&mut self, doc: ContentDocument) {
        self.cover = doc.cover;
        self.content = doc.content;
        self.summary = doc.summary;
    }

    /// Whether the off-chain fields are still empty
    ///
    /// For a released record this means "not yet available", never failure.
    pub fn content_missing(&self) -> bool {
        self.cover.is_empty() && self.content.is_empty() && self.summary.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_unreleased_has_empty_content() {
        let record = MagazineRecord::on_chain(addr(1), "Issue 1", 0);
        assert!(!record.is_released());
        assert!(record.content_missing());
        assert_eq!(record.cover, "");
        assert_eq!(record.content, "");
        assert_eq!(record.summary, "");
    }

    #[test]
    fn test_merge_content() {
        let mut record = MagazineRecord::on_chain(addr(2), "Issue 2", 1_700_000_000_000);
        record.merge_content(ContentDocument {
            cover: "bafy-cover?filename=cover.png".into(),
            content: "bafy-pdf?filename=issue2.pdf".into(),
            summary: "A summary".into(),
        });
        assert!(!record.content_missing());
        assert_eq!(record.summary, "A summary");
    }

    #[test]
    fn test_empty_document_roundtrip() {
        let doc = ContentDocument::empty();
        assert!(doc.is_empty());
        let json = serde_json::to_string(&doc).unwrap();
        let back: ContentDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }
}
