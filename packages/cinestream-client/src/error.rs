//! Error types for the client.

use std::fmt;

/// Client setup error.
#[derive(Debug)]
pub enum Error {
    /// Configuration error.
    Config(String),
    /// Key loading or parsing error.
    Key(String),
    /// RPC communication error.
    Rpc(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Key(msg) => write!(f, "key error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
