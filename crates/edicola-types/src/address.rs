//! Checked on-chain addresses
//!
//! Addresses are 0x-prefixed 20-byte hex strings, validated before any
//! network call so a malformed address never costs a transaction attempt.

use crate::{EdicolaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a canonical address string: "0x" + 40 hex digits
pub const ADDRESS_LEN: usize = 42;

/// A checked on-chain address, stored lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and validate an address string
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.len() != ADDRESS_LEN || !trimmed.starts_with("0x") {
            return Err(EdicolaError::Validation(format!(
                "malformed address: {trimmed:?}"
            )));
        }
        if !trimmed[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(EdicolaError::Validation(format!(
                "non-hex character in address: {trimmed:?}"
            )));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// The canonical lowercase string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display: `0x123456...89abc`
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..8], &self.0[self.0.len() - 5..])
    }
}

impl FromStr for Address {
    type Err = EdicolaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "0x52908400098527886E0F7030069857D2E4169EE7";

    #[test]
    fn test_parse_lowercases() {
        let addr = Address::parse(ADDR).unwrap();
        assert_eq!(addr.as_str(), ADDR.to_lowercase());
    }

    #[test]
    fn test_rejects_bad_length() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("").is_err());
    }

    #[test]
    fn test_rejects_missing_prefix() {
        let no_prefix = format!("00{}", &ADDR[2..]);
        assert!(Address::parse(&no_prefix).is_err());
    }

    #[test]
    fn test_rejects_non_hex() {
        let bad = format!("0xzz{}", &ADDR[4..]);
        assert!(Address::parse(&bad).is_err());
    }

    #[test]
    fn test_validation_is_local() {
        match Address::parse("nonsense") {
            Err(EdicolaError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_short_form() {
        let addr = Address::parse(ADDR).unwrap();
        assert_eq!(addr.short(), "0x529084...69ee7");
    }
}
