//! RPC client with primary → fallback failover and circuit breaker.

use near_crypto::PublicKey;
use near_jsonrpc_client::errors::JsonRpcError;
use near_jsonrpc_client::methods::{self, RpcMethod};
use near_jsonrpc_client::JsonRpcClient;
use near_jsonrpc_primitives::types::query::QueryResponseKind;
use near_primitives::hash::CryptoHash;
use near_primitives::transaction::SignedTransaction;
use near_primitives::types::{AccountId, BlockReference, Finality, FunctionArgs};
use near_primitives::views::{
    AccessKeyView, FinalExecutionOutcomeView, QueryRequest, TxExecutionStatus,
};
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, info, warn};

const CIRCUIT_BREAKER_THRESHOLD: u64 = 3;
const CIRCUIT_BREAKER_WINDOW_MS: u64 = 30_000;

struct CircuitState {
    failures: u64,
    last_failure_ms: u64,
    open: bool,
}

/// JSON-RPC client for one network.
pub struct RpcClient {
    primary: JsonRpcClient,
    fallback: Option<JsonRpcClient>,
    primary_url: String,
    fallback_url: Option<String>,
    circuit: Mutex<CircuitState>,
}

impl RpcClient {
    /// First URL is the primary, the second (if any) the fallback.
    pub fn new(rpc_urls: &[String]) -> Result<Self, crate::Error> {
        let primary_url = rpc_urls
            .first()
            .ok_or_else(|| crate::Error::Config("network has no RPC URL".into()))?
            .clone();
        let fallback_url = rpc_urls.get(1).cloned();
        info!(primary = %primary_url, fallback = ?fallback_url, "RPC client initialized");
        Ok(Self {
            primary: JsonRpcClient::connect(&primary_url),
            fallback: fallback_url.as_deref().map(JsonRpcClient::connect),
            primary_url,
            fallback_url,
            circuit: Mutex::new(CircuitState {
                failures: 0,
                last_failure_ms: 0,
                open: false,
            }),
        })
    }

    /// Chain id reported by the node.
    pub async fn chain_id(&self) -> Result<String, crate::Error> {
        let status = self
            .call("status", || methods::status::RpcStatusRequest)
            .await?;
        Ok(status.chain_id)
    }

    /// Run a view function at final finality and return the raw result.
    pub async fn view_function(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: Vec<u8>,
    ) -> Result<Vec<u8>, crate::Error> {
        let resp = self
            .call("call_function", || methods::query::RpcQueryRequest {
                block_reference: BlockReference::Finality(Finality::Final),
                request: QueryRequest::CallFunction {
                    account_id: contract_id.clone(),
                    method_name: method_name.to_string(),
                    args: FunctionArgs::from(args.clone()),
                },
            })
            .await?;

        match resp.kind {
            QueryResponseKind::CallResult(result) => {
                for log in &result.logs {
                    debug!(method = method_name, log = %log, "view log");
                }
                Ok(result.result)
            }
            other => Err(crate::Error::Rpc(format!(
                "unexpected query response: {other:?}"
            ))),
        }
    }

    /// Hash of the latest final block, used to anchor transactions.
    pub async fn latest_block_hash(&self) -> Result<CryptoHash, crate::Error> {
        let block = self
            .call("block", || methods::block::RpcBlockRequest {
                block_reference: BlockReference::Finality(Finality::Final),
            })
            .await?;
        Ok(block.header.hash)
    }

    /// Access key of the signer, for its current nonce.
    pub async fn query_access_key(
        &self,
        account_id: &AccountId,
        public_key: &PublicKey,
    ) -> Result<AccessKeyView, crate::Error> {
        let resp = self
            .call("view_access_key", || methods::query::RpcQueryRequest {
                block_reference: BlockReference::Finality(Finality::Final),
                request: QueryRequest::ViewAccessKey {
                    account_id: account_id.clone(),
                    public_key: public_key.clone(),
                },
            })
            .await?;

        match resp.kind {
            QueryResponseKind::AccessKey(ak) => Ok(ak),
            other => Err(crate::Error::Rpc(format!(
                "unexpected query response: {other:?}"
            ))),
        }
    }

    /// Broadcast a signed transaction and return its hash immediately.
    pub async fn send_tx_async(&self, signed_tx: SignedTransaction) -> Result<CryptoHash, crate::Error> {
        self.call("broadcast_tx_async", || {
            methods::broadcast_tx_async::RpcBroadcastTxAsyncRequest {
                signed_transaction: signed_tx.clone(),
            }
        })
        .await
    }

    /// Wait for a transaction to reach finality.
    pub async fn tx_status(
        &self,
        tx_hash: CryptoHash,
        sender_id: &AccountId,
    ) -> Result<FinalExecutionOutcomeView, crate::Error> {
        let resp = self
            .call("tx", || methods::tx::RpcTransactionStatusRequest {
                transaction_info: methods::tx::TransactionInfo::TransactionId {
                    tx_hash,
                    sender_account_id: sender_id.clone(),
                },
                wait_until: TxExecutionStatus::Final,
            })
            .await?;

        resp.final_execution_outcome
            .map(|e| e.into_outcome())
            .ok_or_else(|| crate::Error::Rpc("transaction not final yet".into()))
    }

    /// Currently active RPC URL.
    pub fn active_url(&self) -> &str {
        match (&self.fallback_url, self.is_circuit_open()) {
            (Some(url), true) => url,
            _ => &self.primary_url,
        }
    }

    // --- Failover / circuit breaker ---

    /// Send one request on the active client, falling back once on failure.
    async fn call<M, F>(&self, what: &str, make_request: F) -> Result<M::Response, crate::Error>
    where
        M: RpcMethod,
        F: Fn() -> M,
        JsonRpcError<M::Error>: fmt::Display,
    {
        let (client, on_primary) = self.active();
        match client.call(make_request()).await {
            Ok(resp) => {
                if on_primary {
                    self.record_success();
                }
                Ok(resp)
            }
            Err(e) => {
                let Some(fallback) = self.fallback.as_ref().filter(|_| on_primary) else {
                    return Err(crate::Error::Rpc(format!("{what} failed: {e}")));
                };
                self.record_failure();
                warn!(error = %e, method = what, "Primary RPC failed, trying fallback");
                fallback.call(make_request()).await.map_err(|e2| {
                    crate::Error::Rpc(format!("{what} failed: primary={e}, fallback={e2}"))
                })
            }
        }
    }

    /// Active client and whether it is the primary.
    fn active(&self) -> (&JsonRpcClient, bool) {
        match &self.fallback {
            Some(fallback) if self.is_circuit_open() => (fallback, false),
            _ => (&self.primary, true),
        }
    }

    fn record_success(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if circuit.failures > 0 {
            info!(primary = %self.primary_url, "Primary RPC recovered");
            circuit.failures = 0;
            circuit.open = false;
        }
    }

    fn record_failure(&self) {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        circuit.failures += 1;
        circuit.last_failure_ms = now_ms();
        if circuit.failures >= CIRCUIT_BREAKER_THRESHOLD && !circuit.open {
            circuit.open = true;
            warn!(
                failures = circuit.failures,
                fallback = ?self.fallback_url,
                "Circuit breaker opened, routing to fallback"
            );
        }
    }

    fn is_circuit_open(&self) -> bool {
        let mut circuit = self.circuit.lock().unwrap_or_else(|e| e.into_inner());
        if !circuit.open {
            return false;
        }
        if now_ms().saturating_sub(circuit.last_failure_ms) > CIRCUIT_BREAKER_WINDOW_MS {
            circuit.open = false;
            circuit.failures = 0;
            info!(primary = %self.primary_url, "Circuit breaker half-open, retrying primary");
            return false;
        }
        true
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
