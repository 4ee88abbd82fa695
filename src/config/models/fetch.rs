//! Fetch gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Configuration for the SSRF-safe fetcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Deadline for an entire fetch call, in milliseconds.
    ///
    /// One deadline covers the whole redirect chain; hops never reset the
    /// clock.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum number of redirects followed before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,
    /// Fixed outbound client identification string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    /// Read fetch settings from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout_ms: std::env::var("READGATE_FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_ms),
            max_redirects: std::env::var("READGATE_MAX_REDIRECTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_redirects),
            user_agent: std::env::var("READGATE_USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// Merge fetch configurations
    pub fn merge(mut self, other: Self) -> Self {
        if other.timeout_ms != default_timeout_ms() {
            self.timeout_ms = other.timeout_ms;
        }
        if other.max_redirects != default_max_redirects() {
            self.max_redirects = other.max_redirects;
        }
        if other.user_agent != default_user_agent() {
            self.user_agent = other.user_agent;
        }
        self
    }

    /// Validate fetch configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_ms == 0 {
            return Err("Fetch timeout cannot be 0".to_string());
        }

        if self.max_redirects > 20 {
            return Err("Redirect limit above 20 is not supported".to_string());
        }

        if self.user_agent.is_empty() {
            return Err("User agent cannot be empty".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_ms, 8000);
        assert_eq!(config.max_redirects, 5);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        let mut config = FetchConfig {
            timeout_ms: 0,
            ..FetchConfig::default()
        };
        assert!(config.validate().is_err());

        config.timeout_ms = 8000;
        config.max_redirects = 21;
        assert!(config.validate().is_err());

        config.max_redirects = 0;
        assert!(config.validate().is_ok());
    }
}
