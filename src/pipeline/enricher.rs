//! Fee detail enrichment for newly discovered transfers

use super::fetcher::{fetch_all, FetchResult};
use super::requests::detail_request;
use super::types::TransferRecord;
use crate::explorer::ExplorerApi;
use crate::format::{bandwidth_description, energy_description};
use crate::http::HttpClient;
use serde::Deserialize;
use std::sync::Arc;

/// `cost` object of a transaction-info response
///
/// Individual fields the explorer leaves out count as zero.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionCost {
    #[serde(default)]
    pub net_fee: u64,
    #[serde(default)]
    pub energy_fee: u64,
    #[serde(default)]
    pub energy_usage_total: u64,
}

#[derive(Debug, Deserialize)]
struct TransactionInfo {
    cost: Option<TransactionCost>,
}

/// Pull the cost detail out of a detail response, if it is usable
///
/// Only HTTP 200 responses carrying a `cost` object qualify.
pub fn transaction_cost(result: &FetchResult) -> Option<TransactionCost> {
    let payload = result.as_ref().ok()?;
    if payload.status != 200 {
        return None;
    }

    TransactionInfo::deserialize(&payload.body).ok()?.cost
}

/// Attach bandwidth/energy annotations to every record whose detail fetch succeeded
///
/// Records are returned in input order; the ones without usable detail
/// are passed through unannotated.
pub async fn enrich_transfers(
    client: Arc<dyn HttpClient>,
    api: &ExplorerApi,
    mut records: Vec<TransferRecord>,
    concurrency: usize,
) -> Vec<TransferRecord> {
    if records.is_empty() {
        return records;
    }

    let requests = records
        .iter()
        .map(|record| detail_request(api, &record.transaction_id))
        .collect();

    let results = fetch_all(client, requests, concurrency).await;

    let mut missing = 0usize;
    for (record, result) in records.iter_mut().zip(results.iter()) {
        match transaction_cost(result) {
            Some(cost) => {
                record.band_width = Some(bandwidth_description(cost.net_fee));
                record.energy = Some(energy_description(cost.energy_fee, cost.energy_usage_total));
            }
            None => {
                missing += 1;
                match result {
                    Err(e) => log::warn!("⚠️  No fee detail for {}: {}", record.transaction_id, e),
                    Ok(_) => log::warn!("⚠️  No cost field in detail for {}", record.transaction_id),
                }
            }
        }
    }

    if missing > 0 {
        log::info!("   └─ {} of {} transfer(s) forwarded without fee detail", missing, records.len());
    }

    records
}
