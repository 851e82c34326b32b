//! CLI command implementations

pub mod admin;
pub mod catalog;
pub mod market;
pub mod owner;
pub mod search;
pub mod status;
pub mod watch;
