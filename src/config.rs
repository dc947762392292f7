//! Client configuration loaded from environment variables.
//!
//! Everything is read once at startup. A `.env` file in the working
//! directory is honored for local development.

use std::env;
use std::path::PathBuf;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the leads API, without a trailing slash.
    pub api_base_url: String,
    /// Where the current session is persisted between runs.
    pub session_file: PathBuf,
    /// ISO2 country preselected for phone entry.
    pub default_country: String,
    /// Page size for lead listings.
    pub page_size: u32,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            session_file: PathBuf::from(".leads_session.json"),
            default_country: "BR".to_string(),
            page_size: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Only `LEADS_API_BASE_URL` is required. A trailing slash on the base
    /// URL is stripped so paths can always be joined with a leading `/`.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            api_base_url: env::var("LEADS_API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("LEADS_API_BASE_URL"))?,
            session_file: env::var("LEADS_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".leads_session.json")),
            default_country: env::var("LEADS_DEFAULT_COUNTRY")
                .map(|v| v.trim().to_uppercase())
                .unwrap_or_else(|_| "BR".to_string()),
            page_size: env::var("LEADS_PAGE_SIZE")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
