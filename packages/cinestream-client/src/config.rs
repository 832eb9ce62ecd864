//! Client configuration.

use crate::wallet::NetworkConfig;
use serde::Deserialize;

/// Configuration for the CineStream client.
///
/// Loaded from an optional `cinestream.toml` and `CINESTREAM_*` env vars.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "defaults::chain_id")]
    pub chain_id: String,

    #[serde(default = "defaults::chain_name")]
    pub chain_name: String,

    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    #[serde(default = "defaults::explorer_url")]
    pub explorer_url: String,

    #[serde(default = "defaults::contract_id")]
    pub contract_id: String,

    #[serde(default = "defaults::keys_path")]
    pub keys_path: String,

    #[serde(default = "defaults::gas_tgas")]
    pub gas_tgas: u64,

    /// Label shown in reward messages.
    #[serde(default = "defaults::token_symbol")]
    pub token_symbol: String,

    /// Ask on stdin before signing.
    #[serde(default = "defaults::confirm")]
    pub confirm: bool,

    /// Attached to `watch_movie` for storage; unused NEAR is refunded.
    #[serde(default = "defaults::watch_deposit_millinear")]
    pub watch_deposit_millinear: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chain_id: defaults::chain_id(),
            chain_name: defaults::chain_name(),
            rpc_url: defaults::rpc_url(),
            fallback_rpc_url: defaults::fallback_rpc_url(),
            explorer_url: defaults::explorer_url(),
            contract_id: defaults::contract_id(),
            keys_path: defaults::keys_path(),
            gas_tgas: defaults::gas_tgas(),
            token_symbol: defaults::token_symbol(),
            confirm: defaults::confirm(),
            watch_deposit_millinear: defaults::watch_deposit_millinear(),
        }
    }
}

impl Config {
    /// Load `<file>.toml` (optional) overlaid with `<env_prefix>_*` variables.
    ///
    /// A value that fails to parse is an error; nothing falls back to defaults
    /// silently.
    pub fn load(file: &str, env_prefix: &str) -> Result<Self, crate::Error> {
        ::config::Config::builder()
            .add_source(::config::File::with_name(file).required(false))
            .add_source(::config::Environment::with_prefix(env_prefix))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Watch deposit in yoctoNEAR.
    pub fn watch_deposit(&self) -> u128 {
        u128::from(self.watch_deposit_millinear) * 10u128.pow(21)
    }

    /// The network the client expects the wallet to be on.
    pub fn network(&self) -> NetworkConfig {
        let mut rpc_urls = vec![self.rpc_url.clone()];
        if !self.fallback_rpc_url.is_empty() && self.fallback_rpc_url != self.rpc_url {
            rpc_urls.push(self.fallback_rpc_url.clone());
        }
        NetworkConfig {
            chain_id: self.chain_id.clone(),
            chain_name: self.chain_name.clone(),
            rpc_urls,
            explorer_url: self.explorer_url.clone(),
        }
    }
}

mod defaults {
    pub fn chain_id() -> String {
        "testnet".into()
    }

    pub fn chain_name() -> String {
        "NEAR Testnet".into()
    }

    pub fn rpc_url() -> String {
        "https://rpc.testnet.near.org".into()
    }

    pub fn fallback_rpc_url() -> String {
        "https://test.rpc.fastnear.com".into()
    }

    pub fn explorer_url() -> String {
        "https://testnet.nearblocks.io".into()
    }

    pub fn contract_id() -> String {
        "cinestream.testnet".into()
    }

    pub fn keys_path() -> String {
        "./account_keys/cinestream-user.json".into()
    }

    pub fn gas_tgas() -> u64 {
        30
    }

    pub fn token_symbol() -> String {
        "CINE".into()
    }

    pub fn confirm() -> bool {
        true
    }

    pub fn watch_deposit_millinear() -> u64 {
        10
    }
}
