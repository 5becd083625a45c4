//! Runtime configuration for parley.
//!
//! Configuration is environment-based: the base URL of the completion
//! endpoint and a request timeout, each with a fallback default. Nothing
//! is persisted.

use serde::{Deserialize, Serialize};

/// Default base URL when the environment supplies none.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Environment variable for the completion endpoint base URL.
pub const ENV_BASE_URL: &str = "PARLEY_API_URL";

/// Environment variable for the request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "PARLEY_TIMEOUT_SECS";

/// Resolved runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the completion endpoint.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary lookup function.
    ///
    /// Split out from [`from_env`](Self::from_env) so tests don't have to
    /// mutate process-wide environment variables.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(ENV_BASE_URL)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        let timeout_secs = match lookup(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Replace the base URL (a CLI flag wins over the environment).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Errors that can occur resolving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The timeout variable was set but not a number of seconds.
    #[error("invalid PARLEY_TIMEOUT_SECS value: {0:?}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_base_url_from_environment() {
        let config = Config::from_lookup(|key| {
            (key == ENV_BASE_URL).then(|| "http://chat.example:9000".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url, "http://chat.example:9000");
    }

    #[test]
    fn test_blank_base_url_falls_back_to_default() {
        let config =
            Config::from_lookup(|key| (key == ENV_BASE_URL).then(|| "   ".to_string())).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_timeout_from_environment() {
        let config =
            Config::from_lookup(|key| (key == ENV_TIMEOUT_SECS).then(|| "15".to_string()))
                .unwrap();
        assert_eq!(config.timeout_secs, 15);
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        let err = Config::from_lookup(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout(raw) if raw == "soon"));
    }

    #[test]
    fn test_with_base_url_overrides() {
        let config = Config::default().with_base_url("http://other:1234");
        assert_eq!(config.base_url, "http://other:1234");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
