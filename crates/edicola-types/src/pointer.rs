//! Content pointers
//!
//! A released magazine's cover and PDF live behind a content-addressed
//! gateway. The pointer format is `<cid>?filename=<name>`; resolution joins
//! it to the configured base URL, and anything that does not resolve under
//! that base is refused.

use crate::{EdicolaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the content identifier and the filename
pub const FILENAME_SEPARATOR: &str = "?filename=";

/// A parsed off-chain content pointer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPointer {
    /// Content-addressed identifier
    pub cid: String,
    /// Human filename for download and display
    pub filename: String,
}

impl ContentPointer {
    /// Parse a `cid?filename=name` pointer string
    pub fn parse(raw: &str) -> Result<Self> {
        let (cid, filename) = raw.split_once(FILENAME_SEPARATOR).ok_or_else(|| {
            EdicolaError::Validation(format!("content pointer missing filename: {raw:?}"))
        })?;
        if cid.is_empty() || filename.is_empty() {
            return Err(EdicolaError::Validation(format!(
                "incomplete content pointer: {raw:?}"
            )));
        }
        Ok(Self {
            cid: cid.to_string(),
            filename: filename.to_string(),
        })
    }

    /// Resolve against the gateway base URL
    pub fn resolve(&self, base_url: &str) -> String {
        format!(
            "{}/{}{}{}",
            base_url.trim_end_matches('/'),
            self.cid,
            FILENAME_SEPARATOR,
            self.filename
        )
    }

    /// Check that a fully-resolved URL belongs to the expected gateway.
    ///
    /// The UI must refuse to open anything outside the configured base.
    pub fn verify_url(url: &str, base_url: &str) -> Result<()> {
        if url.starts_with(base_url.trim_end_matches('/')) {
            Ok(())
        } else {
            Err(EdicolaError::Validation(format!(
                "refusing content URL outside gateway: {url:?}"
            )))
        }
    }
}

impl FromStr for ContentPointer {
    type Err = EdicolaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ContentPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.cid, FILENAME_SEPARATOR, self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display_roundtrip() {
        let ptr = ContentPointer::parse("bafybeigdyr?filename=issue4.pdf").unwrap();
        assert_eq!(ptr.cid, "bafybeigdyr");
        assert_eq!(ptr.filename, "issue4.pdf");
        assert_eq!(ptr.to_string(), "bafybeigdyr?filename=issue4.pdf");
    }

    #[test]
    fn test_rejects_missing_filename() {
        assert!(ContentPointer::parse("bafybeigdyr").is_err());
        assert!(ContentPointer::parse("bafybeigdyr?filename=").is_err());
        assert!(ContentPointer::parse("?filename=issue.pdf").is_err());
    }

    #[test]
    fn test_resolve_joins_base() {
        let ptr = ContentPointer::parse("bafy?filename=a.pdf").unwrap();
        assert_eq!(
            ptr.resolve("https://gateway.example/ipfs/"),
            "https://gateway.example/ipfs/bafy?filename=a.pdf"
        );
    }

    #[test]
    fn test_verify_url_rejects_foreign_base() {
        let base = "https://gateway.example/ipfs";
        assert!(ContentPointer::verify_url("https://gateway.example/ipfs/bafy", base).is_ok());
        assert!(ContentPointer::verify_url("https://evil.example/bafy", base).is_err());
    }
}
