// Configuration structs

use super::constants::*;
use crate::errors::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level settings, one section per concern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// HTTP service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000")
    pub bind_address: String,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
    /// Enable per-IP rate limiting
    pub rate_limit_enabled: bool,
    /// Sustained requests per second per IP
    pub requests_per_second: f64,
    /// Burst capacity per IP
    pub burst: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_HTTP_ADDR.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            rate_limit_enabled: false,
            requests_per_second: 2.0,
            burst: 20.0,
        }
    }
}

/// Site fetching and extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Sites scraped in parallel during bulk runs
    pub concurrency: usize,
    /// Emails on these domains are discarded
    pub junk_email_domains: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            concurrency: DEFAULT_CONCURRENCY,
            junk_email_domains: DEFAULT_JUNK_EMAIL_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where bulk CSV results are written and served from
    pub results_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// EnvFilter directive used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if self.scraper.timeout_secs == 0 {
            return Err(HarvestError::Validation(
                "scraper.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.scraper.concurrency == 0 {
            return Err(HarvestError::Validation(
                "scraper.concurrency must be at least 1".to_string(),
            ));
        }
        if self.server.rate_limit_enabled
            && (self.server.requests_per_second <= 0.0 || self.server.burst < 1.0)
        {
            return Err(HarvestError::Validation(
                "rate limiting needs requests_per_second > 0 and burst >= 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Parsed bind address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server.bind_address.parse().map_err(|_| {
            HarvestError::Validation(format!(
                "Invalid bind address '{}' (expected IP:PORT, e.g. 0.0.0.0:8000)",
                self.server.bind_address
            ))
        })
    }

    /// Render as TOML (used by `harvest config`)
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
