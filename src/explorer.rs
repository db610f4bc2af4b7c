//! Tronscan explorer API endpoints
//!
//! Endpoints used by the watcher (all GET, relative to the configured base URL):
//! - `/api/token_trc20/transfers` - TRC-20 transfer history of one address
//! - `/api/transaction-info` - fee/cost detail of one transaction
//! - `/api/contract` - contract metadata (startup symbol lookup only)

use crate::http::HttpClient;
use crate::pipeline::extractor::ContractWhitelist;
use crate::pipeline::fetcher::fetch_all;
use crate::pipeline::requests::RequestDescriptor;
use std::sync::Arc;

/// Rows per transfer page; fixed by the explorer
pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerApi {
    base_url: String,
}

impl ExplorerApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Most-recent-first transfer page touching `address`, starting at row `start`
    pub fn transfers_url(&self, address: &str, start: usize) -> String {
        format!(
            "{}/api/token_trc20/transfers?limit={}&start={}&sort=-timestamp&count=true&relatedAddress={}",
            self.base_url, PAGE_SIZE, start, address
        )
    }

    pub fn transaction_info_url(&self, transaction_id: &str) -> String {
        format!("{}/api/transaction-info?hash={}", self.base_url, transaction_id)
    }

    pub fn contract_url(&self, contract_address: &str) -> String {
        format!(
            "{}/api/contract?contract={}&type=contract",
            self.base_url, contract_address
        )
    }
}

/// Resolve the token symbol of every whitelisted contract
///
/// Lookups share one bounded fetch wave. A failed lookup yields `None`;
/// this is informational and never blocks startup.
pub async fn resolve_whitelist_symbols(
    client: Arc<dyn HttpClient>,
    api: &ExplorerApi,
    whitelist: &ContractWhitelist,
    concurrency: usize,
) -> Vec<(String, Option<String>)> {
    let contracts: Vec<String> = whitelist.iter().cloned().collect();
    let requests = contracts
        .iter()
        .map(|address| RequestDescriptor::get(api.contract_url(address)))
        .collect();

    let results = fetch_all(client, requests, concurrency).await;

    contracts
        .into_iter()
        .zip(results)
        .map(|(address, result)| {
            let symbol = result.ok().and_then(|payload| {
                payload
                    .body
                    .pointer("/data/0/tokenInfo/tokenAbbr")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            });
            (address, symbol)
        })
        .collect()
}
