//! Client configuration.

use std::env;

/// Connection settings for the Helix API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the API (e.g. `https://helix.example.com/api`).
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Interval for the background list re-fetch, in seconds.
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: env::var("HELIX_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
            request_timeout_secs: env::var("HELIX_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            poll_interval_secs: env::var("HELIX_POLL_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Config {
    /// Configuration pointed at a specific base URL, everything else default.
    #[must_use]
    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            api_base_url: url.into(),
            ..Self::default()
        }
    }
}
