//! Session context
//!
//! One session per process: the connected signer, its balance, the contract
//! treasury balance, and the resolved role. Never persisted; reset on
//! disconnect and rebuilt on every connect or account change.

use crate::{Address, Role, Wei};
use serde::{Deserialize, Serialize};

/// State of the connected wallet and its view of the contract
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    /// Connected signer, if any
    pub signer: Option<Address>,
    /// Chain id reported by the provider
    pub chain_id: u64,
    /// Native balance of the signer
    pub balance: Wei,
    /// Native balance held by the contract
    pub treasury: Wei,
    /// Resolved role, `Role::None` until a wallet connects
    pub role: Role,
}

impl Session {
    /// Fresh pre-connection session
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a connected signer and its resolved role
    pub fn connect(&mut self, signer: Address, chain_id: u64, role: Role) {
        self.signer = Some(signer);
        self.chain_id = chain_id;
        self.role = role;
    }

    /// Drop all wallet-derived state
    pub fn disconnect(&mut self) {
        *self = Self::default();
    }

    /// Whether a wallet is connected
    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }

    /// Whether an event about `subject` concerns this session's signer
    pub fn is_active_signer(&self, subject: &Address) -> bool {
        self.signer.as_ref() == Some(subject)
    }
}
