use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::AppError;

/// Environment variable holding the enrichment provider's bearer token.
pub const API_KEY_VAR: &str = "FULLENRICH_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://app.fullenrich.com/api/v2";

/// Which profile enricher the service runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentMode {
    Live,
    Mock,
}

/// Fixed-delay polling budget for one enrichment stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 14,
            interval: Duration::from_millis(600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub enrichment_base_url: String,
    pub enrichment_mode: EnrichmentMode,
    pub poll: PollPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = PollPolicy::default();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            enrichment_base_url: validate_base_url(
                std::env::var("ENRICHMENT_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            )?,
            enrichment_mode: match std::env::var("ENRICHMENT_MODE") {
                Ok(mode) => parse_mode(&mode)?,
                Err(_) => EnrichmentMode::Live,
            },
            poll: PollPolicy {
                max_attempts: std::env::var("ENRICHMENT_POLL_ATTEMPTS")
                    .ok()
                    .map(|v| {
                        v.parse().map_err(|_| {
                            anyhow::anyhow!("ENRICHMENT_POLL_ATTEMPTS must be a whole number")
                        })
                    })
                    .transpose()?
                    .unwrap_or(defaults.max_attempts),
                interval: std::env::var("ENRICHMENT_POLL_INTERVAL_MS")
                    .ok()
                    .map(|v| {
                        v.parse().map(Duration::from_millis).map_err(|_| {
                            anyhow::anyhow!("ENRICHMENT_POLL_INTERVAL_MS must be milliseconds")
                        })
                    })
                    .transpose()?
                    .unwrap_or(defaults.interval),
            },
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Enrichment Base URL: {}", config.enrichment_base_url);
        tracing::debug!("Enrichment Mode: {:?}", config.enrichment_mode);
        tracing::debug!(
            "Polling: {} attempts every {:?}",
            config.poll.max_attempts,
            config.poll.interval
        );
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn validate_base_url(url: String) -> anyhow::Result<String> {
    let url = url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("ENRICHMENT_BASE_URL must start with http:// or https://");
    }
    Ok(url.trim_end_matches('/').to_string())
}

fn parse_mode(raw: &str) -> anyhow::Result<EnrichmentMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "live" => Ok(EnrichmentMode::Live),
        "mock" => Ok(EnrichmentMode::Mock),
        other => anyhow::bail!("ENRICHMENT_MODE must be 'live' or 'mock', got '{}'", other),
    }
}

/// Where the provider API key comes from.
///
/// The key is resolved on every call rather than at startup, so a process can
/// boot without it and still fail each enrichment with a configuration error.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// Read the named environment variable at call time.
    Environment(String),
    /// A fixed key, used by tests and embedding callers.
    Fixed(String),
}

impl Default for ApiKeySource {
    fn default() -> Self {
        ApiKeySource::Environment(API_KEY_VAR.to_string())
    }
}

impl ApiKeySource {
    pub fn resolve(&self) -> Result<String, AppError> {
        let key = match self {
            ApiKeySource::Environment(var) => std::env::var(var).map_err(|_| {
                AppError::Configuration(format!("{} environment variable required", var))
            })?,
            ApiKeySource::Fixed(key) => key.clone(),
        };

        if key.trim().is_empty() {
            return Err(AppError::Configuration(
                "enrichment API key cannot be empty".to_string(),
            ));
        }

        Ok(key)
    }
}
