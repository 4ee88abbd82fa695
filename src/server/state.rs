//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::gateway::SafeFetcher;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// The fetcher itself holds no per-request state; every fetch call owns its
/// own session, so sharing one fetcher across all workers needs no locking.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// SSRF-safe fetcher
    pub fetcher: Arc<SafeFetcher>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, fetcher: SafeFetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
        }
    }
}
