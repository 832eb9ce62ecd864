//! Wallet backed by a local NEAR key and JSON-RPC.

use crate::rpc::RpcClient;
use crate::wallet::{FunctionCall, NetworkConfig, TxOutcome, Wallet, WalletError};
use near_crypto::Signer;
use near_primitives::errors::{ActionError, ActionErrorKind, FunctionCallError, TxExecutionError};
use near_primitives::hash::CryptoHash;
use near_primitives::transaction::{Action, FunctionCallAction, Transaction, TransactionV0};
use near_primitives::types::AccountId;
use near_primitives::views::FinalExecutionStatus;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::{info, warn};

const PANIC_MARKER: &str = "Smart contract panicked: ";

struct ActiveNetwork {
    chain_id: String,
    rpc: RpcClient,
}

/// Holds one key, a registry of known networks and the selected network.
pub struct KeyFileWallet {
    signer: Signer,
    networks: HashMap<String, NetworkConfig>,
    active: Option<ActiveNetwork>,
    confirm: bool,
}

impl KeyFileWallet {
    /// Mainnet is known from the start; anything else must be added.
    pub fn new(signer: Signer, confirm: bool) -> Self {
        let mainnet = mainnet();
        let mut networks = HashMap::new();
        networks.insert(mainnet.chain_id.clone(), mainnet);
        Self {
            signer,
            networks,
            active: None,
            confirm,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.signer.get_account_id().clone()
    }

    pub fn active_chain_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.chain_id.as_str())
    }

    fn rpc(&self) -> Result<&RpcClient, WalletError> {
        self.active
            .as_ref()
            .map(|a| &a.rpc)
            .ok_or(WalletError::NotConnected)
    }

    async fn approve(&self, call: &FunctionCall) -> bool {
        if !self.confirm {
            return true;
        }
        let message = format!(
            "Sign {}({}) on {} as {}? [y/N] ",
            call.method_name,
            call.args,
            call.receiver_id,
            self.signer.get_account_id()
        );
        tokio::task::spawn_blocking(move || prompt(&message))
            .await
            .unwrap_or(false)
    }
}

impl Wallet for KeyFileWallet {
    async fn switch_network(&mut self, chain_id: &str) -> Result<(), WalletError> {
        let network = self
            .networks
            .get(chain_id)
            .ok_or_else(|| WalletError::UnknownChain(chain_id.to_string()))?;
        let rpc = RpcClient::new(&network.rpc_urls).map_err(rpc_error)?;

        let reported = rpc.chain_id().await.map_err(rpc_error)?;
        if reported != chain_id {
            return Err(WalletError::Rpc(format!(
                "node at {} serves chain {reported}, expected {chain_id}",
                rpc.active_url()
            )));
        }

        info!(chain_id, rpc = %rpc.active_url(), "Switched network");
        self.active = Some(ActiveNetwork {
            chain_id: chain_id.to_string(),
            rpc,
        });
        Ok(())
    }

    async fn add_network(&mut self, network: &NetworkConfig) -> Result<(), WalletError> {
        if network.rpc_urls.is_empty() {
            return Err(WalletError::Rpc(format!(
                "network {} has no RPC URL",
                network.chain_id
            )));
        }
        info!(chain_id = %network.chain_id, name = %network.chain_name, "Adding network");
        self.networks
            .insert(network.chain_id.clone(), network.clone());
        self.switch_network(&network.chain_id).await
    }

    async fn request_accounts(&mut self) -> Result<Vec<AccountId>, WalletError> {
        self.rpc()?;
        Ok(vec![self.account_id()])
    }

    async fn view(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: Value,
    ) -> Result<Vec<u8>, WalletError> {
        let args = serde_json::to_vec(&args).map_err(|e| WalletError::Rpc(e.to_string()))?;
        self.rpc()?
            .view_function(contract_id, method_name, args)
            .await
            .map_err(rpc_error)
    }

    async fn sign_and_send(&mut self, call: FunctionCall) -> Result<CryptoHash, WalletError> {
        let rpc = self.rpc()?;
        if !self.approve(&call).await {
            warn!(method = %call.method_name, "Transaction declined");
            return Err(WalletError::UserRejected);
        }

        let signer_id = self.account_id();
        let public_key = self.signer.public_key();
        let access_key = rpc
            .query_access_key(&signer_id, &public_key)
            .await
            .map_err(rpc_error)?;
        let block_hash = rpc.latest_block_hash().await.map_err(rpc_error)?;
        let args = serde_json::to_vec(&call.args).map_err(|e| WalletError::Rpc(e.to_string()))?;

        let signed_tx = Transaction::V0(TransactionV0 {
            signer_id,
            public_key,
            nonce: access_key.nonce + 1,
            receiver_id: call.receiver_id,
            block_hash,
            actions: vec![Action::FunctionCall(Box::new(FunctionCallAction {
                method_name: call.method_name,
                args,
                gas: call.gas.as_gas(),
                deposit: call.deposit,
            }))],
        })
        .sign(&self.signer);

        let tx_hash = rpc.send_tx_async(signed_tx).await.map_err(rpc_error)?;
        info!(tx_hash = %tx_hash, "Transaction submitted");
        Ok(tx_hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: CryptoHash) -> Result<TxOutcome, WalletError> {
        let outcome = self
            .rpc()?
            .tx_status(tx_hash, &self.account_id())
            .await
            .map_err(rpc_error)?;

        match &outcome.status {
            FinalExecutionStatus::SuccessValue(_) => {
                let logs = outcome
                    .receipts_outcome
                    .iter()
                    .flat_map(|r| r.outcome.logs.iter().cloned())
                    .collect();
                info!(tx_hash = %tx_hash, "Transaction confirmed");
                Ok(TxOutcome { tx_hash, logs })
            }
            FinalExecutionStatus::Failure(e) => {
                Err(WalletError::Execution(failure_reason(e)))
            }
            FinalExecutionStatus::Started | FinalExecutionStatus::NotStarted => {
                Err(WalletError::Rpc("transaction not final yet".into()))
            }
        }
    }
}

fn mainnet() -> NetworkConfig {
    NetworkConfig {
        chain_id: "mainnet".into(),
        chain_name: "NEAR Mainnet".into(),
        rpc_urls: vec![
            "https://rpc.mainnet.near.org".into(),
            "https://free.rpc.fastnear.com".into(),
        ],
        explorer_url: "https://nearblocks.io".into(),
    }
}

fn rpc_error(e: crate::Error) -> WalletError {
    WalletError::Rpc(e.to_string())
}

/// The contract's panic message when a call panicked, else the error's debug form.
fn failure_reason(err: &TxExecutionError) -> String {
    match err {
        TxExecutionError::ActionError(ActionError {
            kind: ActionErrorKind::FunctionCallError(FunctionCallError::ExecutionError(msg)),
            ..
        }) => msg.strip_prefix(PANIC_MARKER).unwrap_or(msg).to_string(),
        other => format!("{other:?}"),
    }
}

fn prompt(message: &str) -> bool {
    let mut stdout = std::io::stdout();
    if write!(stdout, "{message}").and_then(|_| stdout.flush()).is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}
