//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Fetch gateway configuration
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl GatewayConfig {
    /// Build a configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> crate::utils::error::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_env(),
            fetch: FetchConfig::from_env(),
        })
    }

    /// Merge two configurations, with `other` taking precedence
    pub fn merge(mut self, other: Self) -> Self {
        self.server = self.server.merge(other.server);
        self.fetch = self.fetch.merge(other.fetch);
        self
    }
}
