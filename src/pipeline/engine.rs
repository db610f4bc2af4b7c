//! Reconciliation loop
//!
//! Owns the dedup ledger and drives every pass:
//! 1. Initial pass: the whole wallet list as one batch (errors are fatal)
//! 2. Scoped passes, forever: reload the wallet list, split it into scopes,
//!    process each scope in turn (errors are logged, the loop continues)
//!
//! Both phases run the same `process_batch` routine:
//! fetch pages → extract/filter → classify → enrich → sink → commit.

use super::enricher::enrich_transfers;
use super::extractor::{extract_transfers, ContractWhitelist};
use super::fetcher::fetch_all;
use super::ledger::DedupLedger;
use super::partition::split_into_scopes;
use super::requests::batch_requests;
use super::types::TransferRecord;
use crate::config::{ConfigError, WatchConfig};
use crate::error::WatchError;
use crate::explorer::ExplorerApi;
use crate::http::HttpClient;
use crate::sink::TransferSink;
use crate::wallets::WalletSource;
use std::sync::Arc;
use std::time::Duration;

/// Tunables of the reconciliation loop
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSettings {
    /// Transfer pages requested per wallet
    pub page_count: usize,
    /// Wallets per scope in the scoped phase
    pub scope_size: usize,
    /// Maximum requests in flight per fetch wave
    pub concurrency: usize,
    /// Pause after a failed wallet-list reload
    pub wallet_retry_delay: Duration,
}

impl LoopSettings {
    pub fn from_config(config: &WatchConfig) -> Self {
        Self {
            page_count: config.max_page_count,
            scope_size: config.scope_size,
            concurrency: config.concurrency(),
            wallet_retry_delay: config.wallet_retry_delay,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_count == 0 {
            return Err(ConfigError::InvalidValue("page count must be positive".to_string()));
        }
        if self.scope_size == 0 {
            return Err(ConfigError::InvalidValue("scope size must be positive".to_string()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue("concurrency must be positive".to_string()));
        }
        if self.concurrency > tokio::sync::Semaphore::MAX_PERMITS {
            return Err(ConfigError::InvalidValue(format!(
                "concurrency must not exceed {}",
                tokio::sync::Semaphore::MAX_PERMITS
            )));
        }
        Ok(())
    }
}

pub struct ReconciliationLoop {
    settings: LoopSettings,
    api: ExplorerApi,
    whitelist: ContractWhitelist,
    client: Arc<dyn HttpClient>,
    wallets: Arc<dyn WalletSource>,
    sink: Box<dyn TransferSink>,
    ledger: DedupLedger,
    scoped_passes: u64,
}

impl ReconciliationLoop {
    pub fn new(
        settings: LoopSettings,
        api: ExplorerApi,
        whitelist: ContractWhitelist,
        client: Arc<dyn HttpClient>,
        wallets: Arc<dyn WalletSource>,
        sink: Box<dyn TransferSink>,
    ) -> Result<Self, WatchError> {
        settings.validate()?;

        Ok(Self {
            settings,
            api,
            whitelist,
            client,
            wallets,
            sink,
            ledger: DedupLedger::new(),
            scoped_passes: 0,
        })
    }

    pub fn ledger(&self) -> &DedupLedger {
        &self.ledger
    }

    pub fn scoped_passes(&self) -> u64 {
        self.scoped_passes
    }

    /// Initial pass, then scoped passes until the process is stopped
    ///
    /// Returns only if the initial pass fails.
    pub async fn run(mut self) -> Result<(), WatchError> {
        self.run_initial_pass().await?;

        loop {
            if let Err(e) = self.run_scoped_pass().await {
                log::error!("❌ Scoped pass aborted: {}", e);
                tokio::time::sleep(self.settings.wallet_retry_delay).await;
            }
        }
    }

    /// Process the full wallet list as one batch
    pub async fn run_initial_pass(&mut self) -> Result<usize, WatchError> {
        let wallets = self.wallets.load().await?;
        log::info!("📋 {} wallet addresses loaded", wallets.len());
        log::info!("🔍 Getting {} wallets data concurrently...", wallets.len());

        self.process_batch(&wallets).await
    }

    /// Reload wallets and process them scope by scope
    ///
    /// Per-scope failures are logged and count as zero new transfers. Only a
    /// failed wallet reload aborts the pass.
    pub async fn run_scoped_pass(&mut self) -> Result<usize, WatchError> {
        let wallets = self.wallets.load().await?;
        self.scoped_passes += 1;
        log::info!(
            "📋 {} wallet addresses loaded (pass #{})",
            wallets.len(),
            self.scoped_passes
        );

        let scope_size = self.settings.scope_size;
        let mut total_new = 0usize;

        for (i, scope) in split_into_scopes(&wallets, scope_size)?.into_iter().enumerate() {
            let first = i * scope_size + 1;
            log::info!(
                "🔍 Getting {} - {} wallets data concurrently...",
                first,
                first + scope.len() - 1
            );

            match self.process_batch(scope).await {
                Ok(count) => total_new += count,
                Err(e) => log::error!("❌ Scope {} - {} failed: {}", first, first + scope.len() - 1, e),
            }
        }

        Ok(total_new)
    }

    /// Fetch, reconcile, enrich and deliver the transfers of one wallet batch
    ///
    /// Returns the number of newly reported transfers. New transfers are
    /// committed to the ledger only after the sink accepted them.
    pub async fn process_batch(&mut self, wallets: &[String]) -> Result<usize, WatchError> {
        let requests = batch_requests(&self.api, wallets, self.settings.page_count);
        let request_count = requests.len();

        let results = fetch_all(self.client.clone(), requests, self.settings.concurrency).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            log::warn!("⚠️  {} of {} page request(s) failed", failed, request_count);
        }

        let records: Vec<TransferRecord> = results
            .iter()
            .flat_map(|result| extract_transfers(result, &self.whitelist))
            .collect();

        let (new, already_seen) = self.ledger.classify(records);
        log::info!(
            "   ├─ Scraped {} new transaction(s) ({} already reported)",
            new.len(),
            already_seen.len()
        );

        if new.is_empty() {
            return Ok(0);
        }

        let enriched = enrich_transfers(
            self.client.clone(),
            &self.api,
            new,
            self.settings.concurrency,
        )
        .await;

        self.sink.deliver(&enriched).await?;
        self.ledger.commit(&enriched);

        log::debug!("Ledger now holds {} transfer(s)", self.ledger.len());
        Ok(enriched.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> LoopSettings {
        LoopSettings {
            page_count: 1,
            scope_size: 2,
            concurrency: 4,
            wallet_retry_delay: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_settings_validation() {
        assert!(settings().validate().is_ok());

        let zero_pages = LoopSettings { page_count: 0, ..settings() };
        assert!(zero_pages.validate().is_err());

        let zero_scope = LoopSettings { scope_size: 0, ..settings() };
        assert!(zero_scope.validate().is_err());

        let zero_concurrency = LoopSettings { concurrency: 0, ..settings() };
        assert!(zero_concurrency.validate().is_err());

        let oversized = LoopSettings {
            concurrency: tokio::sync::Semaphore::MAX_PERMITS + 1,
            ..settings()
        };
        assert!(matches!(oversized.validate(), Err(ConfigError::InvalidValue(_))));
    }
}
