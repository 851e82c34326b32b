//! JSON-RPC transport
//!
//! One client per process, shared by reads and writes. Faults are mapped to
//! the taxonomy here and nowhere else: user rejection in the wallet's
//! signing UI (code 4001) becomes `UserCancelled`, a revert with a reason
//! becomes `ChainRejected`, everything else on the wire becomes
//! `ChainUnavailable`.

use crate::abi;
use edicola_types::{EdicolaError, RejectReason, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// JSON-RPC code a wallet-backed endpoint answers when the user declines
pub const USER_REJECTED_CODE: i64 = 4001;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcFault>,
}

#[derive(Debug, Deserialize)]
struct RpcFault {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// HTTP JSON-RPC client for a wallet-backed node endpoint
pub struct JsonRpcClient {
    url: String,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::Client::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// The endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Issue one JSON-RPC request and map any fault to the taxonomy
    pub async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "rpc request");
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| EdicolaError::ChainUnavailable(format!("{method}: {e}")))?;
        if !resp.status().is_success() {
            return Err(EdicolaError::ChainUnavailable(format!(
                "{method}: http {}",
                resp.status()
            )));
        }
        let parsed: RpcResponse = resp
            .json()
            .await
            .map_err(|e| EdicolaError::ChainUnavailable(format!("{method}: {e}")))?;

        if let Some(fault) = parsed.error {
            return Err(map_fault(&fault));
        }
        parsed
            .result
            .ok_or_else(|| EdicolaError::ChainUnavailable(format!("{method}: empty response")))
    }

    /// Request a field that must decode as a string
    pub async fn request_str(&self, method: &str, params: Value) -> Result<String> {
        match self.request(method, params).await? {
            Value::String(s) => Ok(s),
            other => Err(EdicolaError::ChainUnavailable(format!(
                "{method}: expected string, got {other}"
            ))),
        }
    }
}

/// Classify a JSON-RPC fault into the three chain outcomes
fn map_fault(fault: &RpcFault) -> EdicolaError {
    if fault.code == USER_REJECTED_CODE {
        return EdicolaError::UserCancelled;
    }

    // revert reason either inline in the message or as Error(string) data
    if let Some(reason) = revert_reason(fault) {
        return EdicolaError::ChainRejected(RejectReason::from_revert(&reason));
    }
    if fault.message.to_lowercase().contains("revert") {
        return EdicolaError::ChainRejected(RejectReason::Other(fault.message.clone()));
    }

    EdicolaError::ChainUnavailable(format!("rpc {}: {}", fault.code, fault.message))
}

fn revert_reason(fault: &RpcFault) -> Option<String> {
    if let Some(rest) = fault.message.split("execution reverted:").nth(1) {
        let trimmed = rest.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
    }
    match &fault.data {
        Some(Value::String(data)) => abi::decode_revert_reason(data),
        Some(Value::Object(map)) => map
            .get("data")
            .and_then(Value::as_str)
            .and_then(abi::decode_revert_reason),
        _ => None,
    }
}
