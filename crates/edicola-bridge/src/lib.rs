//! Edicola Bridge - the only component that addresses the chain
//!
//! Wraps the storefront contract behind typed read and write operations,
//! converts every wire fault into the shared error taxonomy at this
//! boundary, and watches contract events to reconcile them with the
//! off-chain content store.
//!
//! # Failure posture
//!
//! Every write can fail three independent ways and the distinction is load
//! bearing: user rejection in the signing UI is silent, an on-chain revert
//! maps to a named category, and a transport fault maps to retry-later.

pub mod abi;
pub mod contract;
pub mod events;
pub mod rpc;

pub use contract::{MagazineContract, MagazineReader, Prices, RolePredicates};
pub use events::{ContractEvent, EventReconciler, EventWatcher, LogEntry, Notice};
pub use rpc::JsonRpcClient;
