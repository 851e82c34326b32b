//! Contract event watching and reconciliation
//!
//! The watcher polls `eth_getLogs` for the contract address from the block
//! at subscription time and streams decoded events over an mpsc channel.
//! The reconciler reacts to them: purchase and subscription confirmations
//! only for the active signer, creation events by writing the empty store
//! document. Release events never write the store; the release caller does
//! that after its transaction confirms, so a reader can never observe a
//! released record whose content write was skipped by a missed event.

use crate::rpc::JsonRpcClient;
use edicola_store::ContentStore;
use edicola_types::{Address, ContentPointer, Result, Wei};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::abi;

/// Keccak-256 topics of the contract's events
pub const NEW_MAGAZINE_TOPIC: &str =
    "0x24e6b28361cf2ff4030922a49cba26f0945bd14dcfa6290e08f990d38e610263";
pub const RELEASE_MAGAZINE_TOPIC: &str =
    "0xee668cea8880d3b93c4478889598932aa23a731b7998e165bb378809cd0b05aa";
pub const BUY_ORDER_TOPIC: &str =
    "0x96ff12d19c4148c39752755df8436f109fcf995d46048b57ad6fc3717656d5a2";
pub const SUBSCRIPTION_ORDER_TOPIC: &str =
    "0xd18c3a10dcd959ae282b45190884bf7bf9d816d61e5fdf227421653b6696feb1";
pub const DONATION_TOPIC: &str =
    "0x5d8bc849764969eb1bcc6d0a2f55999d0167c1ccec240a4f39cf664ca9c4148e";

/// Default poll interval for new logs
const POLL_INTERVAL: Duration = Duration::from_secs(4);

/// Decoded contract event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractEvent {
    /// An administrator created a new, unreleased magazine
    NewMagazine { magazine: Address },
    /// An administrator released a magazine
    ReleaseMagazine { magazine: Address },
    /// A customer bought a single issue
    BuyOrder { customer: Address, magazine: Address },
    /// A customer started an annual subscription
    SubscriptionOrder { customer: Address, expiry: u64 },
    /// A donation arrived
    Donation { customer: Address, value: Wei },
}

/// One entry from `eth_getLogs`
#[derive(Debug, Clone, Deserialize)]
pub struct LogEntry {
    pub topics: Vec<String>,
    pub data: String,
    #[serde(rename = "blockNumber", default)]
    pub block_number: Option<String>,
}

/// Decode a log entry into a contract event; unknown topics are skipped
pub fn decode_log(log: &LogEntry) -> Option<ContractEvent> {
    let topic = log.topics.first()?.to_lowercase();
    let data = abi::decode_hex(&log.data).ok()?;
    match topic.as_str() {
        NEW_MAGAZINE_TOPIC => Some(ContractEvent::NewMagazine {
            magazine: abi::decode_address(&data, 0).ok()?,
        }),
        RELEASE_MAGAZINE_TOPIC => Some(ContractEvent::ReleaseMagazine {
            magazine: abi::decode_address(&data, 0).ok()?,
        }),
        BUY_ORDER_TOPIC => Some(ContractEvent::BuyOrder {
            customer: abi::decode_address(&data, 0).ok()?,
            magazine: abi::decode_address(&data, 1).ok()?,
        }),
        SUBSCRIPTION_ORDER_TOPIC => Some(ContractEvent::SubscriptionOrder {
            customer: abi::decode_address(&data, 0).ok()?,
            expiry: u64::try_from(abi::decode_uint(&data, 1).ok()?).ok()?,
        }),
        DONATION_TOPIC => Some(ContractEvent::Donation {
            customer: abi::decode_address(&data, 0).ok()?,
            value: Wei(abi::decode_uint(&data, 1).ok()?),
        }),
        _ => None,
    }
}

/// Polls the endpoint for contract logs and streams decoded events
pub struct EventWatcher {
    rpc: Arc<JsonRpcClient>,
    contract: Address,
    poll_interval: Duration,
}

impl EventWatcher {
    pub fn new(rpc: Arc<JsonRpcClient>, contract: Address) -> Self {
        Self {
            rpc,
            contract,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Run until the receiving side hangs up. Transport faults are logged
    /// and retried on the next tick; the watcher never gives up on its own.
    pub async fn run(self, events: mpsc::Sender<ContractEvent>) {
        let mut next_block: Option<u64> = None;
        loop {
            match self.poll_once(&mut next_block).await {
                Ok(batch) => {
                    for event in batch {
                        debug!(?event, "contract event");
                        if events.send(event).await.is_err() {
                            return;
                        }
                    }
                }
                Err(err) => warn!(%err, "log poll failed, retrying"),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn poll_once(&self, next_block: &mut Option<u64>) -> Result<Vec<ContractEvent>> {
        let latest = self.latest_block().await?;
        let from = match *next_block {
            // first tick: subscribe from "now", not from genesis
            None => {
                *next_block = Some(latest + 1);
                return Ok(Vec::new());
            }
            Some(from) if from > latest => return Ok(Vec::new()),
            Some(from) => from,
        };

        let filter = json!([{
            "address": self.contract.as_str(),
            "fromBlock": format!("0x{from:x}"),
            "toBlock": format!("0x{latest:x}"),
        }]);
        let raw = self.rpc.request("eth_getLogs", filter).await?;
        let entries: Vec<LogEntry> = serde_json::from_value(raw).map_err(|e| {
            edicola_types::EdicolaError::ChainUnavailable(format!("bad log batch: {e}"))
        })?;
        *next_block = Some(latest + 1);
        Ok(entries.iter().filter_map(decode_log).collect())
    }

    async fn latest_block(&self) -> Result<u64> {
        let out = self.rpc.request_str("eth_blockNumber", json!([])).await?;
        let stripped = out.strip_prefix("0x").unwrap_or(&out);
        u64::from_str_radix(stripped, 16).map_err(|_| {
            edicola_types::EdicolaError::ChainUnavailable(format!("bad block number: {out:?}"))
        })
    }
}

/// User-facing outcome of reconciling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The active signer's purchase confirmed; the content URL if available
    Purchased {
        magazine: Address,
        content_url: Option<String>,
    },
    /// The active signer's subscription confirmed
    Subscribed { expires: String },
    /// A new magazine exists; its empty store document was created
    Created { magazine: Address },
    /// A magazine was released; the catalog should be re-fetched
    Released { magazine: Address },
    /// The active signer's donation confirmed
    Donated { value: Wei },
}

/// Applies the off-chain side effects of contract events
pub struct EventReconciler {
    store: Arc<dyn ContentStore>,
    gateway_base: String,
}

impl EventReconciler {
    pub fn new(store: Arc<dyn ContentStore>, gateway_base: &str) -> Self {
        Self {
            store,
            gateway_base: gateway_base.to_string(),
        }
    }

    /// Reconcile one event for the given active signer.
    ///
    /// Returns `None` for events that do not concern this session.
    pub async fn reconcile(
        &self,
        event: &ContractEvent,
        active_signer: Option<&Address>,
    ) -> Result<Option<Notice>> {
        match event {
            ContractEvent::BuyOrder { customer, magazine } => {
                if Some(customer) != active_signer {
                    return Ok(None);
                }
                let content_url = match self.store.find(magazine).await? {
                    Some(doc) if !doc.content.is_empty() => ContentPointer::parse(&doc.content)
                        .ok()
                        .map(|p| p.resolve(&self.gateway_base)),
                    _ => None,
                };
                Ok(Some(Notice::Purchased {
                    magazine: magazine.clone(),
                    content_url,
                }))
            }
            ContractEvent::SubscriptionOrder { customer, expiry } => {
                if Some(customer) != active_signer {
                    return Ok(None);
                }
                Ok(Some(Notice::Subscribed {
                    expires: format_expiry(*expiry),
                }))
            }
            ContractEvent::NewMagazine { magazine } => {
                self.store.create_empty(magazine).await?;
                Ok(Some(Notice::Created {
                    magazine: magazine.clone(),
                }))
            }
            // the release caller writes the store document itself
            ContractEvent::ReleaseMagazine { magazine } => Ok(Some(Notice::Released {
                magazine: magazine.clone(),
            })),
            ContractEvent::Donation { customer, value } => {
                if Some(customer) != active_signer {
                    return Ok(None);
                }
                Ok(Some(Notice::Donated { value: *value }))
            }
        }
    }
}

/// Epoch-millisecond expiry rendered as `dd-mm-yyyy`
fn format_expiry(expiry_ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(expiry_ms as i64)
        .map(|dt| dt.format("%d-%m-%Y").to_string())
        .unwrap_or_else(|| expiry_ms.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use edicola_store::MemoryStore;
    use edicola_types::ContentDocument;

    fn addr(n: u8) -> Address {
        Address::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn word_hex(payloads: &[[u8; 32]]) -> String {
        let mut out = String::from("0x");
        for word in payloads {
            out.push_str(&hex::encode(word));
        }
        out
    }

    fn address_word(address: &Address) -> [u8; 32] {
        let mut word = [0u8; 32];
        let bytes = hex::decode(&address.as_str()[2..]).unwrap();
        word[12..].copy_from_slice(&bytes);
        word
    }

    fn uint_word(value: u128) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        word
    }

    #[test]
    fn test_topics_match_signatures() {
        assert_eq!(abi::event_topic("NewMagazine(address)"), NEW_MAGAZINE_TOPIC);
        assert_eq!(abi::event_topic("ReleaseMagazine(address)"), RELEASE_MAGAZINE_TOPIC);
        assert_eq!(abi::event_topic("BuyOrder(address,address)"), BUY_ORDER_TOPIC);
        assert_eq!(
            abi::event_topic("SubscriptionOrder(address,uint256)"),
            SUBSCRIPTION_ORDER_TOPIC
        );
        assert_eq!(abi::event_topic("Donation(address,uint256)"), DONATION_TOPIC);
    }

    #[test]
    fn test_decode_buy_order_log() {
        let log = LogEntry {
            topics: vec![BUY_ORDER_TOPIC.to_string()],
            data: word_hex(&[address_word(&addr(3)), address_word(&addr(9))]),
            block_number: None,
        };
        assert_eq!(
            decode_log(&log),
            Some(ContractEvent::BuyOrder {
                customer: addr(3),
                magazine: addr(9),
            })
        );
    }

    #[test]
    fn test_unknown_topic_skipped() {
        let log = LogEntry {
            topics: vec![format!("0x{}", "ab".repeat(32))],
            data: "0x".into(),
            block_number: None,
        };
        assert_eq!(decode_log(&log), None);
    }

    #[tokio::test]
    async fn test_buy_for_other_signer_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let reconciler = EventReconciler::new(store, "https://gateway.example/ipfs");
        let event = ContractEvent::BuyOrder {
            customer: addr(3),
            magazine: addr(9),
        };
        let notice = reconciler.reconcile(&event, Some(&addr(4))).await.unwrap();
        assert_eq!(notice, None);
    }

    #[tokio::test]
    async fn test_buy_for_active_signer_resolves_content() {
        let store = Arc::new(MemoryStore::new());
        store
            .update(
                &addr(9),
                ContentDocument {
                    cover: String::new(),
                    content: "bafy?filename=issue.pdf".into(),
                    summary: String::new(),
                },
            )
            .await
            .unwrap();
        let reconciler = EventReconciler::new(store, "https://gateway.example/ipfs");
        let event = ContractEvent::BuyOrder {
            customer: addr(3),
            magazine: addr(9),
        };
        match reconciler.reconcile(&event, Some(&addr(3))).await.unwrap() {
            Some(Notice::Purchased { content_url, .. }) => assert_eq!(
                content_url.as_deref(),
                Some("https://gateway.example/ipfs/bafy?filename=issue.pdf")
            ),
            other => panic!("expected Purchased, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_new_magazine_creates_empty_document() {
        let store = Arc::new(MemoryStore::new());
        let reconciler = EventReconciler::new(store.clone(), "https://gateway.example/ipfs");
        let event = ContractEvent::NewMagazine { magazine: addr(7) };
        // creation events are broadcast; no signer involved
        let notice = reconciler.reconcile(&event, None).await.unwrap();
        assert_eq!(notice, Some(Notice::Created { magazine: addr(7) }));
        let doc = store.find(&addr(7)).await.unwrap().unwrap();
        assert!(doc.is_empty());
    }

    #[tokio::test]
    async fn test_release_event_never_writes_store() {
        let store = Arc::new(MemoryStore::new());
        let reconciler = EventReconciler::new(store.clone(), "https://gateway.example/ipfs");
        let event = ContractEvent::ReleaseMagazine { magazine: addr(8) };
        let notice = reconciler.reconcile(&event, None).await.unwrap();
        assert_eq!(notice, Some(Notice::Released { magazine: addr(8) }));
        assert!(store.is_empty().await);
    }

    #[test]
    fn test_expiry_formatting() {
        // 2024-12-01T00:00:00Z
        assert_eq!(format_expiry(1_733_011_200_000), "01-12-2024");
    }
}
