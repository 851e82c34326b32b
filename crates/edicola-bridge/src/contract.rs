//! Typed operations over the storefront contract
//!
//! `MagazineContract` is the one object allowed to address the chain. It is
//! constructed explicitly once and passed to whoever needs it; the signer is
//! supplied per write because the active account may change between calls.
//! Reads go out as `eth_call`; writes as `eth_sendTransaction` against a
//! wallet-backed endpoint, then wait for the mined receipt.

use crate::abi::{self, Token};
use crate::rpc::JsonRpcClient;
use edicola_types::{Address, EdicolaError, MagazineRecord, RejectReason, Result, Wei};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// How often to poll for a transaction receipt
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Give up waiting for a receipt after this many polls
const RECEIPT_POLL_ATTEMPTS: u32 = 90;

/// The three role predicates evaluated for one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePredicates {
    pub is_owner: bool,
    pub is_administrator: bool,
    pub is_customer: bool,
}

/// Single and annual prices read from the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prices {
    pub single: Wei,
    pub annual: Wei,
}

/// Read seam for the catalog reconciler; implemented by the live contract
/// and by fixtures in tests.
#[async_trait::async_trait]
pub trait MagazineReader: Send + Sync {
    /// Total number of magazines ever created
    async fn count_magazines(&self) -> Result<u64>;

    /// On-chain fields of the magazine at `index`
    async fn magazine_at(&self, index: u64) -> Result<MagazineRecord>;

    /// On-chain fields by address; `None` when no magazine exists there
    async fn magazine_by_address(&self, address: &Address) -> Result<Option<MagazineRecord>>;

    /// Addresses of the signer's own purchases
    async fn customer_magazine_addresses(&self, signer: &Address) -> Result<Vec<Address>>;
}

/// Handle on the deployed storefront contract
pub struct MagazineContract {
    rpc: Arc<JsonRpcClient>,
    address: Address,
}

impl MagazineContract {
    /// Bind to the contract at `address` through the given endpoint
    pub fn new(rpc_url: &str, address: Address) -> Self {
        Self::with_rpc(Arc::new(JsonRpcClient::new(rpc_url)), address)
    }

    /// Bind to the contract over an existing transport
    pub fn with_rpc(rpc: Arc<JsonRpcClient>, address: Address) -> Self {
        Self { rpc, address }
    }

    /// The deployed contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// The underlying transport, shared with the event watcher
    pub fn rpc(&self) -> Arc<JsonRpcClient> {
        self.rpc.clone()
    }

    // ========================================================================
    // Reads
    // ========================================================================

    async fn call(&self, data: Vec<u8>, from: Option<&Address>) -> Result<Vec<u8>> {
        let mut tx = json!({
            "to": self.address.as_str(),
            "data": format!("0x{}", hex::encode(&data)),
        });
        if let Some(from) = from {
            tx["from"] = json!(from.as_str());
        }
        let out = self.rpc.request_str("eth_call", json!([tx, "latest"])).await?;
        abi::decode_hex(&out)
    }

    /// The three role predicates for `address`, evaluated in one pass
    pub async fn role_predicates(&self, address: &Address) -> Result<RolePredicates> {
        let owner_data = self.call(abi::encode_call("owner()", &[]), None).await?;
        let is_owner = abi::decode_address(&owner_data, 0)? == *address;

        let admin_data = self
            .call(abi::encode_call("isAdministrator()", &[]), Some(address))
            .await?;
        let customer_data = self
            .call(abi::encode_call("isCustomer()", &[]), Some(address))
            .await?;

        Ok(RolePredicates {
            is_owner,
            is_administrator: abi::decode_bool(&admin_data, 0)?,
            is_customer: abi::decode_bool(&customer_data, 0)?,
        })
    }

    /// Single-issue and annual-subscription prices
    pub async fn prices(&self) -> Result<Prices> {
        let single = self.call(abi::encode_call("singlePrice()", &[]), None).await?;
        let annual = self.call(abi::encode_call("annualPrice()", &[]), None).await?;
        Ok(Prices {
            single: Wei(abi::decode_uint(&single, 0)?),
            annual: Wei(abi::decode_uint(&annual, 0)?),
        })
    }

    /// Native balance held by the contract
    pub async fn treasury_balance(&self) -> Result<Wei> {
        let data = self.call(abi::encode_call("getBalance()", &[]), None).await?;
        Ok(Wei(abi::decode_uint(&data, 0)?))
    }

    /// Native balance of an arbitrary account
    pub async fn native_balance(&self, address: &Address) -> Result<Wei> {
        let out = self
            .rpc
            .request_str("eth_getBalance", json!([address.as_str(), "latest"]))
            .await?;
        parse_quantity(&out)
    }

    /// Chain id reported by the endpoint
    pub async fn chain_id(&self) -> Result<u64> {
        let out = self.rpc.request_str("eth_chainId", json!([])).await?;
        let id = parse_quantity(&out)?;
        u64::try_from(id.0)
            .map_err(|_| EdicolaError::ChainUnavailable("chain id overflows u64".into()))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    async fn transact(&self, from: &Address, value: Wei, data: Option<Vec<u8>>) -> Result<String> {
        let mut tx = json!({
            "from": from.as_str(),
            "to": self.address.as_str(),
        });
        if !value.is_zero() {
            tx["value"] = json!(format!("0x{:x}", value.value()));
        }
        if let Some(data) = &data {
            tx["data"] = json!(format!("0x{}", hex::encode(data)));
        }
        let hash = self
            .rpc
            .request_str("eth_sendTransaction", json!([tx]))
            .await?;
        debug!(%hash, "transaction sent");
        self.wait_for_receipt(&hash).await?;
        info!(%hash, "transaction confirmed");
        Ok(hash)
    }

    /// Poll until the transaction is mined; a status-0 receipt is a rejection
    async fn wait_for_receipt(&self, hash: &str) -> Result<()> {
        for _ in 0..RECEIPT_POLL_ATTEMPTS {
            let receipt = self
                .rpc
                .request("eth_getTransactionReceipt", json!([hash]))
                .await?;
            match &receipt {
                Value::Null => tokio::time::sleep(RECEIPT_POLL_INTERVAL).await,
                Value::Object(fields) => {
                    return match fields.get("status").and_then(Value::as_str) {
                        Some("0x1") => Ok(()),
                        _ => Err(EdicolaError::ChainRejected(RejectReason::Other(
                            "transaction reverted".into(),
                        ))),
                    };
                }
                _ => {
                    return Err(EdicolaError::ChainUnavailable(
                        "malformed receipt response".into(),
                    ))
                }
            }
        }
        Err(EdicolaError::ChainUnavailable(format!(
            "transaction {hash} not mined in time"
        )))
    }

    /// Create a new, unreleased magazine (administrator only on-chain)
    pub async fn add_magazine(&self, from: &Address, title: &str) -> Result<String> {
        if title.trim().is_empty() {
            return Err(EdicolaError::Validation("magazine title is empty".into()));
        }
        let data = abi::encode_call("addMagazine(string)", &[Token::Str(title.to_string())]);
        self.transact(from, Wei::ZERO, Some(data)).await
    }

    /// Release a magazine (administrator only; rejected if already released).
    ///
    /// The caller is responsible for writing the off-chain content document
    /// after this confirms; the release event handler never writes it.
    pub async fn release_magazine(&self, from: &Address, magazine: &Address) -> Result<String> {
        let data = abi::encode_call(
            "releaseMagazine(address)",
            &[Token::Address(magazine.clone())],
        );
        self.transact(from, Wei::ZERO, Some(data)).await
    }

    /// Buy a single issue, attaching the price as payment
    pub async fn buy_magazine(
        &self,
        from: &Address,
        magazine: &Address,
        price: Wei,
    ) -> Result<String> {
        let data = abi::encode_call("buyMagazine(address)", &[Token::Address(magazine.clone())]);
        self.transact(from, price, Some(data)).await
    }

    /// Start an annual subscription, attaching the price as payment
    pub async fn subscribe_annual(&self, from: &Address, price: Wei) -> Result<String> {
        let data = abi::encode_call("annualSubscribe()", &[]);
        self.transact(from, price, Some(data)).await
    }

    /// Revoke the active subscription
    pub async fn revoke_subscription(&self, from: &Address) -> Result<String> {
        let data = abi::encode_call("revokeSubscription()", &[]);
        self.transact(from, Wei::ZERO, Some(data)).await
    }

    /// Grant another address the administrator role (owner only)
    pub async fn add_administrator(&self, from: &Address, admin: &Address) -> Result<String> {
        let data = abi::encode_call("addAdmin(address)", &[Token::Address(admin.clone())]);
        self.transact(from, Wei::ZERO, Some(data)).await
    }

    /// Withdraw from the treasury (owner only)
    pub async fn withdraw(&self, from: &Address, amount: Wei) -> Result<String> {
        if amount.is_zero() {
            return Err(EdicolaError::Validation("withdrawal amount is zero".into()));
        }
        let data = abi::encode_call("withdraw(uint256)", &[Token::Uint(amount.value())]);
        self.transact(from, Wei::ZERO, Some(data)).await
    }

    /// Distribute the treasury among the on-chain collaborator set (owner only)
    pub async fn split_profit(&self, from: &Address) -> Result<String> {
        let data = abi::encode_call("splitProfit()", &[]);
        self.transact(from, Wei::ZERO, Some(data)).await
    }

    /// Donate: a plain value transfer to the contract, no calldata
    pub async fn donate(&self, from: &Address, amount: Wei) -> Result<String> {
        if amount.is_zero() {
            return Err(EdicolaError::Validation("donation amount is zero".into()));
        }
        self.transact(from, amount, None).await
    }
}

#[async_trait::async_trait]
impl MagazineReader for MagazineContract {
    async fn count_magazines(&self) -> Result<u64> {
        let data = self.call(abi::encode_call("countMagazines()", &[]), None).await?;
        let count = abi::decode_uint(&data, 0)?;
        u64::try_from(count)
            .map_err(|_| EdicolaError::ChainUnavailable("magazine count overflows u64".into()))
    }

    async fn magazine_at(&self, index: u64) -> Result<MagazineRecord> {
        let data = self
            .call(
                abi::encode_call("magazines(uint256)", &[Token::Uint(index as u128)]),
                None,
            )
            .await?;
        let (address, title, release_date) = abi::decode_magazine(&data)?;
        Ok(MagazineRecord::on_chain(address, title, release_date))
    }

    async fn magazine_by_address(&self, address: &Address) -> Result<Option<MagazineRecord>> {
        let data = self
            .call(
                abi::encode_call(
                    "magazineByAddress(address)",
                    &[Token::Address(address.clone())],
                ),
                None,
            )
            .await?;
        if abi::is_zero_address(&data, 0)? {
            return Ok(None);
        }
        let (address, title, release_date) = abi::decode_magazine(&data)?;
        Ok(Some(MagazineRecord::on_chain(address, title, release_date)))
    }

    async fn customer_magazine_addresses(&self, signer: &Address) -> Result<Vec<Address>> {
        let data = self
            .call(abi::encode_call("magazinesByCustomer()", &[]), Some(signer))
            .await?;
        abi::decode_address_array(&data)
    }
}

/// Parse a 0x-prefixed hex quantity
fn parse_quantity(quantity: &str) -> Result<Wei> {
    let stripped = quantity.strip_prefix("0x").unwrap_or(quantity);
    u128::from_str_radix(stripped, 16)
        .map(Wei)
        .map_err(|_| EdicolaError::ChainUnavailable(format!("bad quantity: {quantity:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), Wei::ZERO);
        assert_eq!(parse_quantity("0x2a").unwrap(), Wei(42));
        assert!(parse_quantity("nope").is_err());
    }

    #[tokio::test]
    async fn test_local_validation_before_any_network_call() {
        // endpoint is unroutable on purpose; validation must fail first
        let contract = MagazineContract::new("http://127.0.0.1:1", addr(1));
        let signer = addr(2);

        match contract.add_magazine(&signer, "   ").await {
            Err(EdicolaError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        match contract.withdraw(&signer, Wei::ZERO).await {
            Err(EdicolaError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
        match contract.donate(&signer, Wei::ZERO).await {
            Err(EdicolaError::Validation(_)) => {}
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
