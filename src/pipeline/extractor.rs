//! Transfer extraction and filtering
//!
//! Turns one transfer-page fetch result into zero or more `TransferRecord`s.
//! An entry survives only if it is confirmed, its final result is SUCCESS
//! and its contract is whitelisted. Entries that do not match the expected
//! shape are skipped one by one without affecting the rest of the page.

use super::fetcher::FetchResult;
use super::types::{TransferRecord, RESULT_SUCCESS, STATUS_CONFIRMED};
use crate::format::pretty_amount;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Contract addresses whose transfers are reported; fixed at startup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractWhitelist {
    contracts: BTreeSet<String>,
}

impl ContractWhitelist {
    pub fn contains(&self, contract_address: &str) -> bool {
        self.contracts.contains(contract_address)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.contracts.iter()
    }
}

impl FromIterator<String> for ContractWhitelist {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            contracts: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TransferPage {
    token_transfers: Option<Vec<Value>>,
}

/// One row of `token_transfers`
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransfer {
    pub transaction_id: String,
    pub block: u64,
    pub from_address: String,
    pub to_address: String,
    pub confirmed: bool,
    #[serde(rename = "finalResult")]
    pub final_result: String,
    pub quant: Quantity,
    pub contract_address: String,
    #[serde(rename = "tokenInfo")]
    pub token_info: TokenInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    #[serde(rename = "tokenAbbr")]
    pub token_abbr: String,
}

/// The explorer reports quantities as decimal strings; plain numbers are accepted too
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Text(String),
    Number(u64),
}

impl Quantity {
    pub fn value(&self) -> Option<u128> {
        match self {
            Quantity::Text(s) => s.trim().parse().ok(),
            Quantity::Number(n) => Some(*n as u128),
        }
    }
}

impl RawTransfer {
    fn is_reportable(&self, whitelist: &ContractWhitelist) -> bool {
        self.confirmed
            && self.final_result == RESULT_SUCCESS
            && whitelist.contains(&self.contract_address)
    }

    fn into_record(self) -> Option<TransferRecord> {
        let quant = self.quant.value()?;
        let amount = pretty_amount(quant, &self.token_info.token_abbr);

        Some(TransferRecord {
            transaction_id: self.transaction_id,
            block: self.block,
            from: self.from_address,
            to: self.to_address,
            status: STATUS_CONFIRMED,
            result: RESULT_SUCCESS,
            amount,
            band_width: None,
            energy: None,
            quant,
            contract_address: self.contract_address,
        })
    }
}

/// Extract reportable transfers from one transfer-page result
pub fn extract_transfers(result: &FetchResult, whitelist: &ContractWhitelist) -> Vec<TransferRecord> {
    let payload = match result {
        Ok(payload) => payload,
        Err(_) => return Vec::new(),
    };

    let entries = match TransferPage::deserialize(&payload.body) {
        Ok(TransferPage { token_transfers: Some(entries) }) => entries,
        Ok(_) => return Vec::new(),
        Err(e) => {
            log::debug!("⚠️  Transfer page without token_transfers: {}", e);
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match RawTransfer::deserialize(&entry) {
            Ok(raw) => Some(raw),
            Err(e) => {
                log::debug!("⚠️  Skipping malformed transfer entry: {}", e);
                None
            }
        })
        .filter(|raw| raw.is_reportable(whitelist))
        .filter_map(|raw| {
            let transaction_id = raw.transaction_id.clone();
            let record = raw.into_record();
            if record.is_none() {
                log::debug!("⚠️  Skipping transfer {} with non-integer quant", transaction_id);
            }
            record
        })
        .collect()
}
