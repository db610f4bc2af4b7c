//! TRC-20 transfer watcher
//!
//! Polls the Tronscan API for token transfers touching a watched wallet
//! list, keeps only confirmed successful transfers of whitelisted
//! contracts, enriches new ones with fee detail and reports each of them
//! once to a webhook and an append-only JSON file.

pub mod config;
pub mod error;
pub mod explorer;
pub mod format;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod sink;
pub mod wallets;

pub use config::{ConfigError, WatchConfig};
pub use error::{FetchError, WatchError};
