//! Error types shared across the watcher

use crate::config::ConfigError;

/// Failure of a single HTTP request inside a fetch wave
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    Transport(String),
    /// Server answered with a non-2xx status
    Status(u16),
    /// Body could not be decoded as JSON
    Decode(String),
    /// Worker task died before producing a result
    Aborted,
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "Transport error: {}", e),
            FetchError::Status(code) => write!(f, "Unexpected HTTP status: {}", code),
            FetchError::Decode(e) => write!(f, "Decode error: {}", e),
            FetchError::Aborted => write!(f, "Request task aborted"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(err.to_string()),
        }
    }
}

#[derive(Debug)]
pub enum WatchError {
    Config(ConfigError),
    Fetch(FetchError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    WalletSource(String),
}

impl From<ConfigError> for WatchError {
    fn from(err: ConfigError) -> Self {
        WatchError::Config(err)
    }
}

impl From<FetchError> for WatchError {
    fn from(err: FetchError) -> Self {
        WatchError::Fetch(err)
    }
}

impl From<std::io::Error> for WatchError {
    fn from(err: std::io::Error) -> Self {
        WatchError::Io(err)
    }
}

impl From<serde_json::Error> for WatchError {
    fn from(err: serde_json::Error) -> Self {
        WatchError::Serialization(err)
    }
}

impl std::fmt::Display for WatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatchError::Config(e) => write!(f, "Configuration error: {}", e),
            WatchError::Fetch(e) => write!(f, "Fetch error: {}", e),
            WatchError::Io(e) => write!(f, "IO error: {}", e),
            WatchError::Serialization(e) => write!(f, "Serialization error: {}", e),
            WatchError::WalletSource(e) => write!(f, "Wallet source error: {}", e),
        }
    }
}

impl std::error::Error for WatchError {}
