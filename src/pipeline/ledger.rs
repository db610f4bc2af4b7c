//! In-memory dedup ledger of reported transfers
//!
//! The ledger only grows for the life of the process. It is owned by the
//! reconciliation loop; `classify` and `commit` are never interleaved with
//! another writer.

use super::types::{TransferKey, TransferRecord};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DedupLedger {
    reported: HashSet<TransferKey>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn contains(&self, record: &TransferRecord) -> bool {
        self.reported.contains(&record.key())
    }

    /// Split `records` into `(new, already_seen)`, preserving input order
    ///
    /// A record is new if its identity is not in the ledger and has not
    /// already appeared earlier in `records`. The same transfer shows up on
    /// both wallets' pages when sender and receiver are both watched.
    pub fn classify(&self, records: Vec<TransferRecord>) -> (Vec<TransferRecord>, Vec<TransferRecord>) {
        let mut batch_keys: HashSet<TransferKey> = HashSet::new();
        let mut new = Vec::new();
        let mut already_seen = Vec::new();

        for record in records {
            let key = record.key();
            if self.reported.contains(&key) || !batch_keys.insert(key) {
                already_seen.push(record);
            } else {
                new.push(record);
            }
        }

        (new, already_seen)
    }

    /// Record transfers as reported
    pub fn commit(&mut self, records: &[TransferRecord]) {
        self.reported.extend(records.iter().map(TransferRecord::key));
    }
}
