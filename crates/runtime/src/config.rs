//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use fintrack_api_client::{ApiClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use log::warn;

pub const API_BASE_ENV: &str = "FINTRACK_API_BASE";
pub const DATA_DIR_ENV: &str = "FINTRACK_DATA_DIR";
pub const HTTP_TIMEOUT_ENV: &str = "FINTRACK_HTTP_TIMEOUT_SECS";

pub const DEFAULT_DATA_DIR: &str = "./fintrack-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Blank values count
    /// as unset; an unparseable timeout falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = non_blank(lookup(API_BASE_ENV))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let data_dir = non_blank(lookup(DATA_DIR_ENV))
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let http_timeout = match non_blank(lookup(HTTP_TIMEOUT_ENV)) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "[Runtime] Ignoring invalid {}='{}', using {}s",
                        HTTP_TIMEOUT_ENV, raw, DEFAULT_TIMEOUT_SECS
                    );
                    defaults.http_timeout
                }
            },
            None => defaults.http_timeout,
        };

        Self {
            api_base_url,
            data_dir,
            http_timeout,
        }
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig::new(self.api_base_url.clone()).with_timeout(self.http_timeout)
    }

    pub fn data_dir_string(&self) -> String {
        self.data_dir.to_string_lossy().to_string()
    }
}
