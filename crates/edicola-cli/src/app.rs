//! Application wiring
//!
//! Builds the one contract handle, the store client, and the reconciler,
//! and resolves the session role for the configured signer. Everything is
//! constructed explicitly here and passed down; there is no global state.

use edicola_bridge::{MagazineContract, Prices};
use edicola_catalog::Reconciler;
use edicola_store::{ContentStore, RealtimeStore};
use edicola_types::{Address, EdicolaError, Result, Role, Session};
use std::sync::Arc;
use tracing::info;

/// External configuration, resolved from flags and environment
#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub contract_address: Address,
    pub store_url: String,
    pub gateway_url: String,
    pub catalog_offset: u64,
    pub signer: Option<Address>,
}

/// The connected application: one contract handle, one store client, one
/// session
pub struct App {
    pub contract: Arc<MagazineContract>,
    pub store: Arc<dyn ContentStore>,
    pub reconciler: Reconciler,
    pub session: Session,
    pub config: Config,
}

impl App {
    /// Connect to the chain, resolve the role for the configured signer,
    /// and load balances.
    pub async fn connect(config: Config) -> Result<Self> {
        let contract = Arc::new(MagazineContract::new(
            &config.rpc_url,
            config.contract_address.clone(),
        ));
        let store: Arc<dyn ContentStore> = Arc::new(RealtimeStore::new(&config.store_url));
        let reconciler = Reconciler::new(contract.clone(), store.clone(), config.catalog_offset);

        let mut session = Session::new();
        match &config.signer {
            Some(signer) => {
                let chain_id = contract.chain_id().await?;
                let predicates = contract.role_predicates(signer).await?;
                let role = Role::resolve(
                    predicates.is_owner,
                    predicates.is_administrator,
                    predicates.is_customer,
                );
                session.connect(signer.clone(), chain_id, role);
                session.balance = contract.native_balance(signer).await?;
                session.treasury = contract.treasury_balance().await?;
                info!(%signer, %role, "wallet connected");
            }
            None => {
                // no wallet: browse-only session
                session.role = Role::Visitor;
            }
        }

        Ok(Self {
            contract,
            store,
            reconciler,
            session,
            config,
        })
    }

    /// The signer, or a validation error for operations that need one
    pub fn signer(&self) -> Result<&Address> {
        self.session
            .signer
            .as_ref()
            .ok_or_else(|| EdicolaError::Validation("no signer configured".into()))
    }

    /// Current prices from the contract
    pub async fn prices(&self) -> Result<Prices> {
        self.contract.prices().await
    }

    /// Re-fetch balances after a confirmed write; fresh data without a
    /// wholesale reload.
    pub async fn refresh_balances(&mut self) -> Result<()> {
        if let Some(signer) = self.session.signer.clone() {
            self.session.balance = self.contract.native_balance(&signer).await?;
        }
        self.session.treasury = self.contract.treasury_balance().await?;
        Ok(())
    }

    /// Re-resolve the role after an operation that may have changed it
    /// (a first purchase, a subscription, an admin grant).
    pub async fn refresh_role(&mut self) -> Result<()> {
        if let Some(signer) = self.session.signer.clone() {
            let predicates = self.contract.role_predicates(&signer).await?;
            self.session.role = Role::resolve(
                predicates.is_owner,
                predicates.is_administrator,
                predicates.is_customer,
            );
        }
        Ok(())
    }
}
