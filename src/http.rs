//! HTTP transport seam used by every fetch wave

use crate::error::{FetchError, WatchError};
use async_trait::async_trait;
use std::time::Duration;

/// Raw response of a successful (2xx) GET
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url`; non-2xx statuses are reported as `FetchError::Status`
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

/// reqwest-backed client with a per-request timeout
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, WatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self { client })
    }

    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            body,
        })
    }
}
