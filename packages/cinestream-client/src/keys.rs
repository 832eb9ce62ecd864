//! Wallet key loading.

use near_crypto::{InMemorySigner, SecretKey, Signer};
use std::str::FromStr;
use tracing::info;

/// Env var holding the key JSON inline; wins over the key file.
pub const KEYS_JSON_ENV: &str = "CINESTREAM_KEYS_JSON";

/// Load the wallet key from `CINESTREAM_KEYS_JSON`, else from `keys_path`.
pub fn load_signer(keys_path: &str) -> Result<Signer, crate::Error> {
    let json = match std::env::var(KEYS_JSON_ENV) {
        Ok(json) if !json.is_empty() => json,
        _ => std::fs::read_to_string(keys_path)
            .map_err(|e| crate::Error::Key(format!("cannot read {keys_path}: {e}")))?,
    };
    let signer = parse_keys_json(&json)?;
    info!(account = %signer.get_account_id(), "Loaded wallet key");
    Ok(signer)
}

/// Parse keys JSON in the near-cli format, either a single object or an array:
/// `{"account_id": "...", "public_key": "...", "secret_key": "..."}`
pub fn parse_keys_json(json: &str) -> Result<Signer, crate::Error> {
    #[derive(serde::Deserialize)]
    struct KeyFile {
        account_id: String,
        #[serde(alias = "private_key")]
        secret_key: String,
    }

    let key: KeyFile = if json.trim().starts_with('[') {
        let keys: Vec<KeyFile> = serde_json::from_str(json)
            .map_err(|e| crate::Error::Key(format!("Invalid key JSON: {e}")))?;
        keys.into_iter()
            .next()
            .ok_or_else(|| crate::Error::Key("Empty key array".to_string()))?
    } else {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::Key(format!("Invalid key JSON: {e}")))?
    };

    let secret_key = SecretKey::from_str(&key.secret_key)
        .map_err(|e| crate::Error::Key(format!("Invalid secret key: {e}")))?;

    Ok(InMemorySigner::from_secret_key(
        key.account_id
            .parse()
            .map_err(|e| crate::Error::Key(format!("Invalid account: {e}")))?,
        secret_key,
    ))
}
