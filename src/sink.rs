//! Delivery of new transfer batches
//!
//! Each batch is serialized once as a pretty-printed JSON array and:
//! - POSTed to the webhook in a background task (failure logged, never fatal)
//! - appended to the local result file (failure returned to the caller)

use crate::error::WatchError;
use crate::pipeline::types::TransferRecord;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[async_trait]
pub trait TransferSink: Send {
    /// Hand off one batch of new transfers
    ///
    /// Returns only once the batch is durably recorded.
    async fn deliver(&mut self, batch: &[TransferRecord]) -> Result<(), WatchError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}

/// Append-only JSON record of every delivered batch
pub struct ResultFile {
    file: File,
    path: PathBuf,
}

impl ResultFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WatchError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&mut self, json: &str) -> Result<(), WatchError> {
        writeln!(self.file, "{}", json)?;
        self.file.flush()?;
        Ok(())
    }
}

pub struct WebhookFileSink {
    client: reqwest::Client,
    webhook_url: String,
    result_file: ResultFile,
}

impl WebhookFileSink {
    pub fn new(client: reqwest::Client, webhook_url: impl Into<String>, result_file: ResultFile) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
            result_file,
        }
    }

    fn post_in_background(&self, body: String, count: usize) {
        let request = self
            .client
            .post(&self.webhook_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        tokio::spawn(async move {
            match request.send().await.and_then(|r| r.error_for_status()) {
                Ok(_) => log::info!("   ├─ Webhook post success ({} transfer(s))", count),
                Err(e) => log::error!("❌ Webhook post failed: {}", e),
            }
        });
    }
}

#[async_trait]
impl TransferSink for WebhookFileSink {
    async fn deliver(&mut self, batch: &[TransferRecord]) -> Result<(), WatchError> {
        let json = serde_json::to_string_pretty(batch)?;

        self.post_in_background(json.clone(), batch.len());
        self.result_file.append(&json)?;

        log::info!(
            "✅ {} confirmed transfer(s) recorded to {}",
            batch.len(),
            self.result_file.path().display()
        );
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "Webhook+JSON"
    }
}
