//! Client configuration
//!
//! Sources are layered: built-in defaults, then `~/.config/tally/config.toml`
//! (or an explicit file), then `TALLY_*` environment variables.

mod loader;

pub use loader::{
    DEFAULT_CONFIG_FILE, apply_env_overrides, default_config_path, load_config,
    load_config_from_file,
};

use crate::error::{TallyError, TallyResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default timeout values for the transport
pub mod timeouts {
    use std::time::Duration;

    /// Default connection timeout (10 seconds)
    pub const CONNECT_SECS: u64 = 10;

    /// Get connection timeout as Duration
    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_SECS)
    }
}

/// Configuration for the Tally client layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend address every request is resolved against
    pub base_url: String,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Overall request timeout in seconds. `None` leaves requests bounded
    /// only by the transport's own behavior.
    pub request_timeout_secs: Option<u64>,
    /// Directory holding the session and preference files
    pub data_dir: Option<PathBuf>,
    /// Number of transactions shown on the dashboard
    pub recent_limit: u32,
    /// Default number of transactions shown in history
    pub history_limit: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: timeouts::CONNECT_SECS,
            request_timeout_secs: None,
            data_dir: None,
            recent_limit: 8,
            history_limit: 50,
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at `base_url` with every other value defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Set the overall request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Connection timeout as Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as Duration, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Resolved data directory (`~/.tally` unless overridden)
    pub fn resolved_data_dir(&self) -> TallyResult<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(".tally"))
            .ok_or_else(|| TallyError::config("Cannot determine home directory for data_dir"))
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> TallyResult<()> {
        let parsed = url::Url::parse(&self.base_url).map_err(|e| {
            TallyError::config_with_context(
                format!("Invalid base_url '{}': {}", self.base_url, e),
                "Validating client configuration",
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TallyError::config(format!(
                "base_url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if self.recent_limit == 0 || self.history_limit == 0 {
            return Err(TallyError::config("Transaction limits must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recent_limit, 8);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(ClientConfig::new("not a url").validate().is_err());
        assert!(ClientConfig::new("ftp://example.com").validate().is_err());
    }

    #[test]
    fn test_base_url_trims_slash() {
        let config = ClientConfig::new("http://localhost:8000/api/");
        assert_eq!(config.base_url(), "http://localhost:8000/api");
    }

    #[test]
    fn test_explicit_data_dir() {
        let config = ClientConfig::default().with_data_dir("/tmp/tally-test");
        assert_eq!(
            config.resolved_data_dir().unwrap(),
            PathBuf::from("/tmp/tally-test")
        );
    }
}
