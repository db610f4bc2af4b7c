//! # Fetch-and-reconcile pipeline
//!
//! Polls the explorer for TRC-20 transfers of the watched wallets and
//! reports each confirmed, whitelisted transfer exactly once per process
//! lifetime.
//!
//! ## Data flow
//!
//! ```text
//! wallet list → partition → requests → fetcher → extractor → ledger.classify
//!            → enricher (second fetch wave) → sink → ledger.commit → loop
//! ```
//!
//! ## Concurrency
//!
//! A single task owns the `ReconciliationLoop` and its `DedupLedger`.
//! Parallelism exists only inside a fetch wave, where `bounded_parallel_map`
//! caps in-flight requests. Scopes are processed strictly one after another.
//!
//! ## Module Organization
//!
//! - `types` - `TransferRecord` and its identity key
//! - `partition` - wallet list → fixed-size scopes
//! - `requests` - paginated transfer and detail request descriptors
//! - `fetcher` - bounded parallel map and batch HTTP fetch
//! - `extractor` - page payload → filtered transfer records
//! - `ledger` - dedup ledger of reported transfers
//! - `enricher` - fee detail annotations
//! - `engine` - the reconciliation loop

pub mod types;
pub mod partition;
pub mod requests;
pub mod fetcher;
pub mod extractor;
pub mod ledger;
pub mod enricher;
pub mod engine;

// Re-export commonly used types
pub use types::{TransferKey, TransferRecord};
pub use extractor::ContractWhitelist;
pub use fetcher::{bounded_parallel_map, fetch_all, FetchResult, FetchedPayload};
pub use ledger::DedupLedger;
pub use engine::{LoopSettings, ReconciliationLoop};
