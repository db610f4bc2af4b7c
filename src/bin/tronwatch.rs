//! TRC-20 transfer watcher runtime
//!
//! Runs the initial pass over the whole wallet list, then scoped passes
//! forever. Exits only on a configuration error or a failed initial pass.
//!
//! Usage:
//!   cargo run --release --bin tronwatch
//!
//! Environment variables (see `tronwatch::config` for the full list):
//!   MAX_PAGE_COUNT, WEBHOOK_URL, WALLET_LIST_URL, ONE_SCOPE_ITEMS_COUNT,
//!   CONTRACT_ADDRESS*, RUST_LOG, LOG_FILE

use dotenv::dotenv;
use log::{error, info, warn};
use std::sync::Arc;
use tronwatch::{
    config::WatchConfig,
    explorer::{resolve_whitelist_symbols, ExplorerApi},
    http::{HttpClient, ReqwestHttpClient},
    logging::init_logging,
    pipeline::{LoopSettings, ReconciliationLoop},
    sink::{ResultFile, TransferSink, WebhookFileSink},
    wallets::HttpWalletSource,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_logging();

    info!("🚀 Starting tronwatch...");

    let config = WatchConfig::from_env().map_err(|e| {
        error!("❌ {}", e);
        e
    })?;
    let settings = LoopSettings::from_config(&config);

    info!("📊 Configuration:");
    info!("   ├─ Explorer: {}", config.explorer_api_url);
    info!("   ├─ Wallet list: {}", config.wallet_list_url);
    info!("   ├─ Webhook: {}", config.webhook_url);
    info!("   ├─ Result file: {}", config.result_path.display());
    info!("   ├─ Pages per wallet: {}", settings.page_count);
    info!("   ├─ Scope size: {}", settings.scope_size);
    info!("   └─ Max parallel requests: {}", settings.concurrency);

    let http = ReqwestHttpClient::new(config.request_timeout)?;
    let webhook_client = http.inner().clone();
    let client: Arc<dyn HttpClient> = Arc::new(http);
    let api = ExplorerApi::new(config.explorer_api_url.clone());

    info!("📜 {} whitelisted contract(s):", config.contracts.len());
    for (address, symbol) in
        resolve_whitelist_symbols(client.clone(), &api, &config.contracts, settings.concurrency).await
    {
        match symbol {
            Some(symbol) => info!("   ├─ {} ({})", address, symbol),
            None => warn!("   ├─ {} (Not found)", address),
        }
    }

    let result_file = ResultFile::open(&config.result_path)?;
    let sink = WebhookFileSink::new(webhook_client, config.webhook_url.clone(), result_file);
    info!("📝 Sink backend: {}", sink.backend_type());

    let wallets = Arc::new(HttpWalletSource::new(client.clone(), config.wallet_list_url.clone()));

    let engine = ReconciliationLoop::new(
        settings,
        api,
        config.contracts.clone(),
        client,
        wallets,
        Box::new(sink),
    )?;

    if let Err(e) = engine.run().await {
        error!("❌ Initial pass failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
