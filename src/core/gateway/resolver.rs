//! DNS resolution seam
//!
//! The fetcher never resolves names itself; it goes through the
//! [`DnsResolver`] trait so the gateway is unit-testable without a real
//! network (rebinding simulations swap answers between calls). The
//! production implementation rides on hickory-resolver with the system
//! configuration.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use hickory_resolver::config::ResolverOpts;
use thiserror::Error;

/// DNS resolution failure. Always treated as a blocked destination by the
/// authorizer (fail-closed), never surfaced to end users in detail.
#[derive(Debug, Clone, Error)]
#[error("resolution failed for {host}: {message}")]
pub struct ResolveError {
    /// Hostname being resolved
    pub host: String,
    /// Resolver-specific detail (logged, never user-facing)
    pub message: String,
}

impl ResolveError {
    pub fn new(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            message: message.into(),
        }
    }
}

/// Capability to resolve a hostname to all of its address records.
///
/// Implementations must perform a fresh lookup on every call; any caching
/// here would reopen the DNS-rebinding window the authorizer exists to
/// close.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// Resolve every address record for `host`, both address families.
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

/// Production resolver backed by hickory-resolver.
pub struct HickoryDnsResolver {
    resolver: TokioResolver,
}

impl HickoryDnsResolver {
    /// Build a resolver from the system configuration.
    pub fn from_system() -> Result<Self, ResolveError> {
        let mut builder = TokioResolver::builder_tokio()
            .map_err(|e| ResolveError::new("resolver", e.to_string()))?;
        Self::configure(builder.options_mut());
        Ok(Self {
            resolver: builder.build(),
        })
    }

    /// Every lookup must reach the network: a cached answer would stand in
    /// for the fresh resolution the authorizer performs before each
    /// connection, reopening the rebinding window.
    fn configure(options: &mut ResolverOpts) {
        options.cache_size = 0;
    }

    /// Wrap in an `Arc<dyn DnsResolver>` for injection into the fetcher.
    pub fn shared() -> Result<Arc<dyn DnsResolver>, ResolveError> {
        Ok(Arc::new(Self::from_system()?))
    }
}

#[async_trait]
impl DnsResolver for HickoryDnsResolver {
    async fn resolve(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let response = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| ResolveError::new(host, e.to_string()))?;

        Ok(response.iter().collect())
    }
}
