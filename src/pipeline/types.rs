//! Core transfer types

use serde::Serialize;

pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const RESULT_SUCCESS: &str = "SUCCESS";

/// A confirmed, successful, whitelisted TRC-20 transfer
///
/// Serialized as the JSON object delivered to the webhook and result file.
/// `band_width` and `energy` are only present once the detail wave
/// succeeded for this transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferRecord {
    pub transaction_id: String,
    pub block: u64,
    pub from: String,
    pub to: String,
    pub status: &'static str,
    pub result: &'static str,
    /// Symbol-scaled display amount, e.g. "1,250.00 USDT"
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<String>,
    /// Raw integer quantity as reported by the explorer
    #[serde(skip)]
    pub quant: u128,
    /// TRC-20 contract that moved the tokens
    #[serde(skip)]
    pub contract_address: String,
}

impl TransferRecord {
    pub fn key(&self) -> TransferKey {
        TransferKey {
            transaction_id: self.transaction_id.clone(),
            block: self.block,
            from: self.from.clone(),
            to: self.to.clone(),
            quant: self.quant,
            contract_address: self.contract_address.clone(),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.band_width.is_some() && self.energy.is_some()
    }
}

/// Identity of a transfer: two records with equal keys are the same transfer
///
/// One transaction may move several tokens between the same pair of
/// addresses, so the contract is part of the identity next to the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransferKey {
    pub transaction_id: String,
    pub block: u64,
    pub from: String,
    pub to: String,
    pub quant: u128,
    pub contract_address: String,
}
