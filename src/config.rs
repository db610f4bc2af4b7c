//! Watcher configuration from environment variables
//!
//! Required:
//! - `MAX_PAGE_COUNT` - transfer pages requested per wallet (20 rows each)
//! - `WEBHOOK_URL` - endpoint receiving each batch of new transfers
//! - `WALLET_LIST_URL` - newline-delimited wallet address list
//! - `ONE_SCOPE_ITEMS_COUNT` - wallets processed per scope
//!
//! Whitelisted contracts are every variable whose name starts with
//! `CONTRACT_ADDRESS` (`CONTRACT_ADDRESS_USDT`, `CONTRACT_ADDRESS2`, ...).
//!
//! Optional:
//! - `EXPLORER_API_URL` (default: https://apilist.tronscan.org)
//! - `RESULT_PATH` (default: result.json)
//! - `MAX_PARALLEL_REQUEST_PER_CPU` (default: 30)
//! - `REQUEST_TIMEOUT_SECS` (default: 10)
//! - `WALLET_RETRY_DELAY_SECS` (default: 5)

use crate::pipeline::extractor::ContractWhitelist;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::Semaphore;

pub const CONTRACT_PREFIX: &str = "CONTRACT_ADDRESS";
pub const DEFAULT_EXPLORER_API_URL: &str = "https://apilist.tronscan.org";
pub const DEFAULT_PARALLEL_PER_CPU: usize = 30;

#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub max_page_count: usize,
    pub webhook_url: String,
    pub wallet_list_url: String,
    pub scope_size: usize,
    pub contracts: ContractWhitelist,
    pub explorer_api_url: String,
    pub result_path: PathBuf,
    pub parallel_per_cpu: usize,
    pub request_timeout: Duration,
    pub wallet_retry_delay: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl WatchConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::vars())
    }

    /// Build the configuration from an arbitrary set of key/value pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: HashMap<String, String> = vars.into_iter().collect();

        let max_page_count = parse_positive(&vars, "MAX_PAGE_COUNT", None)?;
        let scope_size = parse_positive(&vars, "ONE_SCOPE_ITEMS_COUNT", None)?;
        let webhook_url = required(&vars, "WEBHOOK_URL")?;
        let wallet_list_url = required(&vars, "WALLET_LIST_URL")?;

        for (name, url) in [("WEBHOOK_URL", &webhook_url), ("WALLET_LIST_URL", &wallet_list_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "{} must start with http:// or https://",
                    name
                )));
            }
        }

        let contracts: ContractWhitelist = vars
            .iter()
            .filter(|(key, _)| key.starts_with(CONTRACT_PREFIX))
            .map(|(_, value)| value.trim().to_string())
            .filter(|address| !address.is_empty())
            .collect();

        if contracts.is_empty() {
            log::warn!(
                "No {}* variables set, every transfer will be filtered out",
                CONTRACT_PREFIX
            );
        }

        let explorer_api_url = vars
            .get("EXPLORER_API_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_EXPLORER_API_URL.to_string());

        let result_path = vars
            .get("RESULT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("result.json"));

        let parallel_per_cpu = parse_positive(
            &vars,
            "MAX_PARALLEL_REQUEST_PER_CPU",
            Some(DEFAULT_PARALLEL_PER_CPU),
        )?;
        scale_concurrency(parallel_per_cpu, available_cpus())?;

        let request_timeout = Duration::from_secs(parse_positive(&vars, "REQUEST_TIMEOUT_SECS", Some(10))? as u64);

        let wallet_retry_delay =
            Duration::from_secs(parse_positive(&vars, "WALLET_RETRY_DELAY_SECS", Some(5))? as u64);

        Ok(Self {
            max_page_count,
            webhook_url,
            wallet_list_url,
            scope_size,
            contracts,
            explorer_api_url,
            result_path,
            parallel_per_cpu,
            request_timeout,
            wallet_retry_delay,
        })
    }

    /// Maximum requests in flight during one fetch wave
    pub fn concurrency(&self) -> usize {
        scale_concurrency(self.parallel_per_cpu, available_cpus()).unwrap_or(Semaphore::MAX_PERMITS)
    }
}

fn available_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Per-CPU request ceiling times the CPU count, bounded by what a semaphore can hold
pub fn scale_concurrency(per_cpu: usize, cpus: usize) -> Result<usize, ConfigError> {
    per_cpu
        .checked_mul(cpus)
        .filter(|total| *total <= Semaphore::MAX_PERMITS)
        .ok_or_else(|| {
            ConfigError::InvalidValue(format!(
                "MAX_PARALLEL_REQUEST_PER_CPU={} across {} CPUs exceeds {} permits",
                per_cpu,
                cpus,
                Semaphore::MAX_PERMITS
            ))
        })
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    vars.get(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConfigError::MissingVariable(name.to_string()))
}

fn parse_positive(
    vars: &HashMap<String, String>,
    name: &str,
    default: Option<usize>,
) -> Result<usize, ConfigError> {
    let raw = match (vars.get(name), default) {
        (Some(raw), _) => raw,
        (None, Some(value)) => return Ok(value),
        (None, None) => return Err(ConfigError::MissingVariable(name.to_string())),
    };

    match raw.trim().parse::<usize>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> Vec<(String, String)> {
        vec![
            ("MAX_PAGE_COUNT", "3"),
            ("WEBHOOK_URL", "https://webhook.site/abc"),
            ("WALLET_LIST_URL", "https://example.com/wallets.txt"),
            ("ONE_SCOPE_ITEMS_COUNT", "20"),
            ("CONTRACT_ADDRESS", "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"),
            ("CONTRACT_ADDRESS_BTC", "TN3W4H6rK2ce4vX9YnFQHwKENnHjoxb3m9"),
            ("UNRELATED", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn with(mut vars: Vec<(String, String)>, key: &str, value: &str) -> Vec<(String, String)> {
        vars.retain(|(k, _)| k != key);
        vars.push((key.to_string(), value.to_string()));
        vars
    }

    fn without(mut vars: Vec<(String, String)>, key: &str) -> Vec<(String, String)> {
        vars.retain(|(k, _)| k != key);
        vars
    }

    #[test]
    fn test_default_config() {
        let config = WatchConfig::from_vars(base_vars()).unwrap();

        assert_eq!(config.max_page_count, 3);
        assert_eq!(config.scope_size, 20);
        assert_eq!(config.explorer_api_url, DEFAULT_EXPLORER_API_URL);
        assert_eq!(config.result_path, PathBuf::from("result.json"));
        assert_eq!(config.parallel_per_cpu, 30);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.wallet_retry_delay, Duration::from_secs(5));
        assert!(config.concurrency() >= 30);
    }

    #[test]
    fn test_contract_prefix_collection() {
        let config = WatchConfig::from_vars(base_vars()).unwrap();

        assert_eq!(config.contracts.len(), 2);
        assert!(config.contracts.contains("TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t"));
        assert!(config.contracts.contains("TN3W4H6rK2ce4vX9YnFQHwKENnHjoxb3m9"));
        assert!(!config.contracts.contains("ignored"));
    }

    #[test]
    fn test_custom_optional_values() {
        let vars = with(base_vars(), "EXPLORER_API_URL", "http://localhost:8080/");
        let vars = with(vars, "RESULT_PATH", "/tmp/out.json");
        let vars = with(vars, "MAX_PARALLEL_REQUEST_PER_CPU", "4");

        let config = WatchConfig::from_vars(vars).unwrap();

        assert_eq!(config.explorer_api_url, "http://localhost:8080");
        assert_eq!(config.result_path, PathBuf::from("/tmp/out.json"));
        assert_eq!(config.parallel_per_cpu, 4);
    }

    #[test]
    fn test_missing_required_variable() {
        let err = WatchConfig::from_vars(without(base_vars(), "WEBHOOK_URL")).unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable("WEBHOOK_URL".to_string()));

        let err = WatchConfig::from_vars(without(base_vars(), "MAX_PAGE_COUNT")).unwrap_err();
        assert_eq!(err, ConfigError::MissingVariable("MAX_PAGE_COUNT".to_string()));
    }

    #[test]
    fn test_non_positive_scope_size_rejected() {
        let err = WatchConfig::from_vars(with(base_vars(), "ONE_SCOPE_ITEMS_COUNT", "0")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = WatchConfig::from_vars(with(base_vars(), "ONE_SCOPE_ITEMS_COUNT", "-5")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_oversized_parallelism_rejected() {
        let err = WatchConfig::from_vars(with(
            base_vars(),
            "MAX_PARALLEL_REQUEST_PER_CPU",
            &usize::MAX.to_string(),
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));

        let err = WatchConfig::from_vars(with(
            base_vars(),
            "MAX_PARALLEL_REQUEST_PER_CPU",
            &(Semaphore::MAX_PERMITS + 1).to_string(),
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_scale_concurrency() {
        assert_eq!(scale_concurrency(30, 8), Ok(240));
        assert_eq!(scale_concurrency(Semaphore::MAX_PERMITS, 1), Ok(Semaphore::MAX_PERMITS));
        assert!(scale_concurrency(Semaphore::MAX_PERMITS, 2).is_err());
        assert!(scale_concurrency(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_wallet_retry_delay_validated() {
        let config = WatchConfig::from_vars(with(base_vars(), "WALLET_RETRY_DELAY_SECS", "12")).unwrap();
        assert_eq!(config.wallet_retry_delay, Duration::from_secs(12));

        for bad in ["soon", "0", "-1"] {
            let err = WatchConfig::from_vars(with(base_vars(), "WALLET_RETRY_DELAY_SECS", bad)).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(_)));
        }
    }

    #[test]
    fn test_invalid_url_rejected() {
        let err = WatchConfig::from_vars(with(base_vars(), "WALLET_LIST_URL", "ftp://x")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
