//! Watched wallet list source

use crate::error::WatchError;
use crate::http::HttpClient;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait WalletSource: Send + Sync {
    /// Current ordered wallet list; re-read before every pass
    async fn load(&self) -> Result<Vec<String>, WatchError>;
}

/// Newline-delimited address list served over HTTP
pub struct HttpWalletSource {
    client: Arc<dyn HttpClient>,
    url: String,
}

impl HttpWalletSource {
    pub fn new(client: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl WalletSource for HttpWalletSource {
    async fn load(&self) -> Result<Vec<String>, WatchError> {
        let response = self
            .client
            .get(&self.url)
            .await
            .map_err(|e| WatchError::WalletSource(format!("{}: {}", self.url, e)))?;

        Ok(parse_wallet_list(&response.body))
    }
}

/// One address per line; surrounding whitespace and blank lines are dropped
pub fn parse_wallet_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
