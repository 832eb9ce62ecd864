//! # CineStream Client
//!
//! Terminal client for the CineStream watch-to-earn ledger. Connects a wallet
//! to the configured network, shows the featured movies, and submits
//! `watch_movie` transactions that credit reward tokens.
//!
//! ## Quick Start
//! ```bash
//! CINESTREAM_CONTRACT_ID=cinestream.testnet cargo run --bin cinestream -- watch "Neon City"
//! ```

pub mod catalog;
pub mod config;
mod error;
pub mod key_file_wallet;
pub mod keys;
pub mod rpc;
pub mod session;
pub mod units;
pub mod wallet;

pub use config::Config;
pub use error::Error;
pub use key_file_wallet::KeyFileWallet;
pub use session::{Session, Status};
pub use units::format_units;
pub use wallet::{NetworkConfig, Wallet, WalletError};
