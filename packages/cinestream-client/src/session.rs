//! Client session: the connect and watch flows.
//!
//! Each step is a single wallet round trip. A failing step ends the flow with
//! a status; nothing is retried and only one transaction is in flight.

use crate::catalog::ListedMovie;
use crate::config::Config;
use crate::units::format_units;
use crate::wallet::{FunctionCall, NetworkConfig, TxOutcome, Wallet, WalletError};
use near_gas::NearGas;
use near_primitives::hash::CryptoHash;
use near_primitives::types::AccountId;
use serde_json::{json, Value};
use std::fmt;
use tracing::{info, warn};

const TOKEN_DECIMALS: u32 = 18;
const REWARD_TOKENS: &str = "10";
const ERROR_PREVIEW_CHARS: usize = 100;

/// User-facing status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    ConnectWallet,
    InstallWallet,
    NetworkSwitchFailed,
    Connected,
    ConnectionRejected,
    WalletNotInstalled,
    AlreadyWatched,
    Watching(String),
    ConfirmInWallet,
    Rewarded { title: String, symbol: String },
    /// An owner call went through; holds the method name.
    Confirmed(String),
    UserDenied,
    /// Holds the already truncated error message.
    Failed(String),
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Status::InstallWallet
                | Status::NetworkSwitchFailed
                | Status::ConnectionRejected
                | Status::WalletNotInstalled
                | Status::AlreadyWatched
                | Status::UserDenied
                | Status::Failed(_)
        )
    }

    fn from_error(err: &WalletError) -> Self {
        let message = match err {
            WalletError::UserRejected => return Status::UserDenied,
            WalletError::Rpc(msg) | WalletError::Execution(msg) => msg.clone(),
            other => other.to_string(),
        };
        Status::Failed(message.chars().take(ERROR_PREVIEW_CHARS).collect())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::ConnectWallet => f.write_str("Connect wallet to start"),
            Status::InstallWallet => f.write_str("Install a NEAR wallet"),
            Status::NetworkSwitchFailed => f.write_str("Failed to switch network"),
            Status::Connected => f.write_str("Connected!"),
            Status::ConnectionRejected => f.write_str("Connection rejected"),
            Status::WalletNotInstalled => f.write_str("Wallet not installed"),
            Status::AlreadyWatched => f.write_str("You already watched this movie!"),
            Status::Watching(title) => write!(f, "Watching \"{title}\"..."),
            Status::ConfirmInWallet => f.write_str("Confirm transaction in wallet..."),
            Status::Rewarded { title, symbol } => write!(
                f,
                "Success! You earned {REWARD_TOKENS} {symbol} tokens for watching \"{title}\""
            ),
            Status::Confirmed(method) => write!(f, "Transaction confirmed: {method}"),
            Status::UserDenied => f.write_str("User denied transaction"),
            Status::Failed(msg) => write!(f, "Error: {msg}..."),
        }
    }
}

/// One user's view of the ledger through a wallet.
pub struct Session<W> {
    wallet: Option<W>,
    network: NetworkConfig,
    contract_id: AccountId,
    gas: NearGas,
    watch_deposit: u128,
    token_symbol: String,
    account: Option<AccountId>,
    last_tx: Option<CryptoHash>,
    balance: String,
    status: Status,
    log: Vec<Status>,
}

impl<W: Wallet> Session<W> {
    /// `wallet` is `None` when no wallet could be loaded.
    pub fn new(config: &Config, wallet: Option<W>) -> Result<Self, crate::Error> {
        let contract_id = config.contract_id.parse().map_err(|e| {
            crate::Error::Config(format!("invalid contract_id {}: {e}", config.contract_id))
        })?;
        Ok(Self {
            wallet,
            network: config.network(),
            contract_id,
            gas: NearGas::from_tgas(config.gas_tgas),
            watch_deposit: config.watch_deposit(),
            token_symbol: config.token_symbol.clone(),
            account: None,
            last_tx: None,
            balance: "0".into(),
            status: Status::ConnectWallet,
            log: vec![Status::ConnectWallet],
        })
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Every status the session has shown, oldest first.
    pub fn status_log(&self) -> &[Status] {
        &self.log
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }

    /// Last read balance, formatted with 18 decimals.
    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn wallet(&self) -> Option<&W> {
        self.wallet.as_ref()
    }

    /// Explorer page of the last submitted transaction.
    pub fn explorer_link(&self) -> Option<String> {
        let tx_hash = self.last_tx?;
        Some(format!(
            "{}/txns/{tx_hash}",
            self.network.explorer_url.trim_end_matches('/')
        ))
    }

    /// Select the network, expose the account and read its balance.
    pub async fn connect(&mut self) -> &Status {
        if self.wallet.is_none() {
            return self.set_status(Status::InstallWallet);
        }

        if let Err(e) = self.select_network().await {
            warn!(error = %e, chain_id = %self.network.chain_id, "Network switch failed");
            return self.set_status(Status::NetworkSwitchFailed);
        }

        match self.request_account().await {
            Ok(account) => {
                info!(account = %account, "Wallet connected");
                self.account = Some(account);
            }
            Err(e) => {
                warn!(error = %e, "Account request failed");
                return self.set_status(Status::ConnectionRejected);
            }
        }
        self.set_status(Status::Connected);

        if let Err(e) = self.refresh_balance().await {
            warn!(error = %e, "Balance read failed");
            return self.set_status(Status::ConnectionRejected);
        }
        &self.status
    }

    /// Re-read the connected account's balance.
    pub async fn refresh_balance(&mut self) -> Result<(), WalletError> {
        let account = self.account.clone().ok_or(WalletError::NotConnected)?;
        let raw: String = self
            .wallet_ref()?
            .view_json(
                &self.contract_id,
                "balance_of",
                json!({ "account_id": account }),
            )
            .await?;
        let value: u128 = raw
            .parse()
            .map_err(|e| WalletError::Rpc(format!("invalid balance {raw}: {e}")))?;

        self.balance = format_units(value, TOKEN_DECIMALS);
        info!(account = %account, balance = %self.balance, "Balance updated");
        Ok(())
    }

    /// Check, submit and confirm a watch, then re-read the balance.
    pub async fn watch_movie(&mut self, title: &str) -> &Status {
        if self.wallet.is_none() {
            return self.set_status(Status::WalletNotInstalled);
        }

        match self.already_watched(title).await {
            Ok(true) => return self.set_status(Status::AlreadyWatched),
            Ok(false) => {}
            Err(e) => return self.fail(&e),
        }

        self.set_status(Status::Watching(title.to_string()));
        let call = self.function_call(
            "watch_movie",
            json!({ "title": title }),
            self.watch_deposit,
        );
        if let Err(e) = self.submit(call).await {
            return self.fail(&e);
        }
        if let Err(e) = self.refresh_balance().await {
            return self.fail(&e);
        }

        let symbol = self.token_symbol.clone();
        self.set_status(Status::Rewarded {
            title: title.to_string(),
            symbol,
        })
    }

    pub async fn add_movie(&mut self, title: &str, description: &str, url: &str) -> &Status {
        self.owner_call(
            "add_movie",
            json!({ "title": title, "description": description, "url": url }),
        )
        .await
    }

    pub async fn remove_movie(&mut self, title: &str) -> &Status {
        self.owner_call("remove_movie", json!({ "title": title })).await
    }

    /// One page of the on-chain catalog.
    pub async fn movies(
        &self,
        from_index: u32,
        limit: u32,
    ) -> Result<Vec<ListedMovie>, WalletError> {
        self.wallet_ref()?
            .view_json(
                &self.contract_id,
                "get_movies",
                json!({ "from_index": from_index, "limit": limit }),
            )
            .await
    }

    async fn owner_call(&mut self, method: &str, args: Value) -> &Status {
        if self.wallet.is_none() {
            return self.set_status(Status::WalletNotInstalled);
        }
        let call = self.function_call(method, args, 0);
        match self.submit(call).await {
            Ok(outcome) => {
                for log in &outcome.logs {
                    info!(method, log = %log, "Contract log");
                }
                self.set_status(Status::Confirmed(method.to_string()))
            }
            Err(e) => self.fail(&e),
        }
    }

    async fn select_network(&mut self) -> Result<(), WalletError> {
        let wallet = self.wallet.as_mut().ok_or(WalletError::NotConnected)?;
        match wallet.switch_network(&self.network.chain_id).await {
            Err(WalletError::UnknownChain(chain_id)) => {
                info!(chain_id = %chain_id, "Network unknown to wallet, adding it");
                wallet.add_network(&self.network).await
            }
            other => other,
        }
    }

    async fn request_account(&mut self) -> Result<AccountId, WalletError> {
        let wallet = self.wallet.as_mut().ok_or(WalletError::NotConnected)?;
        wallet
            .request_accounts()
            .await?
            .into_iter()
            .next()
            .ok_or(WalletError::NotConnected)
    }

    async fn ensure_account(&mut self) -> Result<AccountId, WalletError> {
        if let Some(account) = &self.account {
            return Ok(account.clone());
        }
        let account = self.request_account().await?;
        self.account = Some(account.clone());
        Ok(account)
    }

    async fn already_watched(&mut self, title: &str) -> Result<bool, WalletError> {
        let account = self.ensure_account().await?;
        self.wallet_ref()?
            .view_json(
                &self.contract_id,
                "has_watched",
                json!({ "account_id": account, "title": title }),
            )
            .await
    }

    async fn submit(&mut self, call: FunctionCall) -> Result<TxOutcome, WalletError> {
        let method = call.method_name.clone();
        let wallet = self.wallet.as_mut().ok_or(WalletError::NotConnected)?;
        let tx_hash = wallet.sign_and_send(call).await?;
        self.last_tx = Some(tx_hash);
        self.set_status(Status::ConfirmInWallet);

        let outcome = self.wallet_ref()?.wait_for_confirmation(tx_hash).await?;
        info!(method = %method, tx_hash = %outcome.tx_hash, "Transaction final");
        Ok(outcome)
    }

    fn function_call(&self, method_name: &str, args: Value, deposit: u128) -> FunctionCall {
        FunctionCall {
            receiver_id: self.contract_id.clone(),
            method_name: method_name.to_string(),
            args,
            gas: self.gas,
            deposit,
        }
    }

    fn wallet_ref(&self) -> Result<&W, WalletError> {
        self.wallet.as_ref().ok_or(WalletError::NotConnected)
    }

    fn fail(&mut self, err: &WalletError) -> &Status {
        self.set_status(Status::from_error(err))
    }

    fn set_status(&mut self, status: Status) -> &Status {
        if status.is_failure() {
            warn!(status = %status, "Status");
        } else {
            info!(status = %status, "Status");
        }
        self.log.push(status.clone());
        self.status = status;
        &self.status
    }
}
