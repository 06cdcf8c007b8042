//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Backend base URL including `/api` (default: `http://localhost:5000/api`)
//! - `SHOPFRONT_SESSION_FILE` - Where the session `token`/`user` keys are persisted
//!   (default: `.shopfront-session.json`)
//! - `SHOPFRONT_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset means requests never time out
//! - `SHOPFRONT_CURRENCY` - Display currency: `USD`, `INR`, `EUR` or `GBP` (default: `USD`)
//! - `SHOPFRONT_LOG_FORMAT` - `text` or `json` (default: `text`)

use std::path::PathBuf;
use std::time::Duration;

use shopfront_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_SESSION_FILE: &str = ".shopfront-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Shopfront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash
    pub api_url: Url,
    /// Session storage file
    pub session_file: PathBuf,
    /// Optional per-request timeout
    pub request_timeout: Option<Duration>,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: None,
            currency: CurrencyCode::USD,
            log_format: LogFormat::Text,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(get_optional_env)
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match lookup("SHOPFRONT_API_URL") {
            Some(raw) => parse_api_url(&raw)?,
            None => default_api_url(),
        };

        let session_file = lookup("SHOPFRONT_SESSION_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let request_timeout = lookup("SHOPFRONT_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| {
                        ConfigError::InvalidEnvVar(
                            "SHOPFRONT_REQUEST_TIMEOUT_SECS".to_string(),
                            e.to_string(),
                        )
                    })
            })
            .transpose()?;

        let currency = lookup("SHOPFRONT_CURRENCY")
            .map(|raw| parse_currency(&raw))
            .transpose()?
            .unwrap_or_default();

        let log_format = match lookup("SHOPFRONT_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("" | "text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "SHOPFRONT_LOG_FORMAT".to_string(),
                    format!("expected text or json, got {other}"),
                ));
            }
        };

        Ok(Self {
            api_url,
            session_file,
            request_timeout,
            currency,
            log_format,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// # Panics
///
/// Never in practice: the default is a valid absolute URL.
#[allow(clippy::expect_used)]
fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default API URL is valid")
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_API_URL".to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_currency(raw: &str) -> Result<CurrencyCode, ConfigError> {
    match raw.trim().to_ascii_uppercase().as_str() {
        "USD" => Ok(CurrencyCode::USD),
        "INR" => Ok(CurrencyCode::INR),
        "EUR" => Ok(CurrencyCode::EUR),
        "GBP" => Ok(CurrencyCode::GBP),
        other => Err(ConfigError::InvalidEnvVar(
            "SHOPFRONT_CURRENCY".to_string(),
            format!("unsupported currency {other}"),
        )),
    }
}
