//! Wallet provider seam.
//!
//! Every call is an independent round trip to the wallet and/or a node. The
//! session drives these in a fixed order and never retries on its own.

use near_gas::NearGas;
use near_primitives::hash::CryptoHash;
use near_primitives::types::AccountId;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// A network the wallet can be pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: String,
    pub chain_name: String,
    /// Primary first, then fallbacks.
    pub rpc_urls: Vec<String>,
    pub explorer_url: String,
}

/// Wallet failure, as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The wallet has no record of this chain id. Adding the network fixes it.
    UnknownChain(String),
    /// The user declined the request.
    UserRejected,
    /// No network selected or no account exposed yet.
    NotConnected,
    /// Transport or node error.
    Rpc(String),
    /// The transaction executed and failed on chain.
    Execution(String),
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::UnknownChain(id) => write!(f, "unrecognized chain id {id}"),
            WalletError::UserRejected => f.write_str("user rejected the request"),
            WalletError::NotConnected => f.write_str("wallet is not connected"),
            WalletError::Rpc(msg) => write!(f, "rpc error: {msg}"),
            WalletError::Execution(msg) => write!(f, "execution failed: {msg}"),
        }
    }
}

impl std::error::Error for WalletError {}

/// A single contract function call to sign.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub receiver_id: AccountId,
    pub method_name: String,
    pub args: Value,
    pub gas: NearGas,
    pub deposit: u128,
}

/// Final outcome of a confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: CryptoHash,
    pub logs: Vec<String>,
}

#[allow(async_fn_in_trait)]
pub trait Wallet {
    /// Select a network the wallet already knows.
    async fn switch_network(&mut self, chain_id: &str) -> Result<(), WalletError>;

    /// Register a network and select it.
    async fn add_network(&mut self, network: &NetworkConfig) -> Result<(), WalletError>;

    /// Ask the wallet to expose its accounts.
    async fn request_accounts(&mut self) -> Result<Vec<AccountId>, WalletError>;

    /// Read-only contract call. Returns the raw result bytes.
    async fn view(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: Value,
    ) -> Result<Vec<u8>, WalletError>;

    /// Sign and broadcast without waiting for execution.
    async fn sign_and_send(&mut self, call: FunctionCall) -> Result<CryptoHash, WalletError>;

    /// Block until the transaction is final.
    async fn wait_for_confirmation(&self, tx_hash: CryptoHash) -> Result<TxOutcome, WalletError>;

    /// `view` with the result decoded as JSON.
    async fn view_json<T: DeserializeOwned>(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: Value,
    ) -> Result<T, WalletError> {
        let bytes = self.view(contract_id, method_name, args).await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| WalletError::Rpc(format!("invalid {method_name} result: {e}")))
    }
}
