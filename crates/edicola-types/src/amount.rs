//! Native-currency amounts
//!
//! Prices and balances travel as integer wei (u128). Only display code
//! converts to the 18-decimal human form; arithmetic stays on integers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places of the chain's native currency
pub const NATIVE_DECIMALS: u32 = 18;

/// An amount of native currency in smallest units (wei)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Wei(pub u128);

impl Wei {
    /// Zero amount
    pub const ZERO: Wei = Wei(0);

    /// Raw value in smallest units
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Whether the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Human-readable 18-decimal form with trailing zeros trimmed
    pub fn format_native(&self) -> String {
        let unit = 10u128.pow(NATIVE_DECIMALS);
        let whole = self.0 / unit;
        let frac = self.0 % unit;
        if frac == 0 {
            return format!("{whole}");
        }
        let frac = format!("{frac:018}");
        format!("{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl From<u128> for Wei {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Wei {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_native())
    }
}
