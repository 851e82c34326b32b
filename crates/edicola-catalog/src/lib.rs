//! Edicola Catalog - reconciliation of on-chain and off-chain magazine data
//!
//! Two concerns live here: the reconciler, which merges the contract's
//! magazine list with content documents into released/unreleased partitions,
//! and the date-range filter, which selects releases for one calendar month.

pub mod reconciler;
pub mod window;

pub use reconciler::{Catalog, Reconciler};
pub use window::{filter_by_window, window_for};
