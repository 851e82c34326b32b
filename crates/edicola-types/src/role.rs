//! Role resolution
//!
//! A session holds exactly one role, derived from three contract predicates
//! evaluated for the connected address. Precedence is fixed:
//! Owner > Administrator > Customer > Visitor. `None` exists only as the
//! pre-resolution default and is never returned by `resolve`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Privilege level of the connected wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    Administrator,
    Customer,
    Visitor,
    /// No wallet connected yet
    None,
}

impl Role {
    /// Derive the exclusive role from the three on-chain predicates.
    ///
    /// Pure and total; must be re-invoked whenever the connected address or
    /// chain changes, never cached across addresses.
    pub fn resolve(is_owner: bool, is_administrator: bool, is_customer: bool) -> Role {
        if is_owner {
            Role::Owner
        } else if is_administrator {
            Role::Administrator
        } else if is_customer {
            Role::Customer
        } else {
            Role::Visitor
        }
    }

    /// Whether this role sees the administrative catalog view
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Owner | Role::Administrator)
    }

    /// Whether this role sees the storefront catalog view
    pub fn is_reader(&self) -> bool {
        matches!(self, Role::Customer | Role::Visitor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Owner => "Owner",
            Role::Administrator => "Administrator",
            Role::Customer => "Customer",
            Role::Visitor => "Visitor",
            Role::None => "",
        };
        write!(f, "{label}")
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::None
    }
}
