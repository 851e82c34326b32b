//! Edicola Types - Canonical domain types for the magazine storefront
//!
//! This crate contains all foundational types for Edicola with zero
//! dependencies on other edicola crates:
//!
//! - Checked on-chain addresses and native-currency amounts
//! - Magazine records merging on-chain and off-chain fields
//! - Role resolution for the connected wallet
//! - Content pointers into the off-chain gateway
//! - Session context for the connected wallet
//! - The error taxonomy shared by every layer
//!
//! # Ownership of truth
//!
//! The contract is the sole source of truth for addresses, titles, release
//! timestamps, role predicates, and balances. The off-chain store is the
//! sole source of truth for cover, content, and summary. `MagazineRecord`
//! is the merged read-only view; nothing here writes back.

pub mod address;
pub mod amount;
pub mod error;
pub mod magazine;
pub mod pointer;
pub mod role;
pub mod session;

pub use address::*;
pub use amount::*;
pub use error::*;
pub use magazine::*;
pub use pointer::*;
pub use role::*;
pub use session::*;
