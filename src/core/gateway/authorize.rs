//! Destination authorization
//!
//! Decides, immediately before a connection, whether a hostname may be
//! contacted. Resolution is fresh on every call and the result is never
//! cached: re-running this check at each redirect hop is the defense
//! against DNS rebinding and check-to-use races.

use std::net::IpAddr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::classify::classify;
use super::resolver::DnsResolver;

/// A destination refused by the authorizer.
///
/// The reason names the offending address or the resolution failure for
/// server-side logs; user-facing surfaces collapse every denial into one
/// generic message so the gateway cannot be used as an internal-topology
/// oracle.
#[derive(Debug, Clone, Error)]
#[error("destination not allowed: {reason}")]
pub struct HostDenied {
    /// Server-side detail, never shown to end users
    pub reason: String,
}

impl HostDenied {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Authorizes destinations against the IP range policy.
#[derive(Clone)]
pub struct DestinationAuthorizer {
    resolver: Arc<dyn DnsResolver>,
}

impl DestinationAuthorizer {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self { resolver }
    }

    /// Authorize a hostname for one connection.
    ///
    /// Literal IP hosts classify directly without a DNS step. Named hosts
    /// resolve all address records across both families; an empty or
    /// errored resolution is a denial (fail-closed), and a single
    /// non-public address rejects the whole host even when other records
    /// are public.
    pub async fn authorize(&self, host: &str) -> Result<(), HostDenied> {
        // IPv6 literals arrive from the URL parser still bracketed
        let literal = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = literal.parse::<IpAddr>() {
            return check_address(host, ip);
        }

        let addresses = self.resolver.resolve(host).await.map_err(|e| {
            warn!(host = %host, error = %e, "DNS resolution failed, failing closed");
            HostDenied::new(format!("resolution failed for {host}"))
        })?;

        if addresses.is_empty() {
            warn!(host = %host, "DNS returned no records, failing closed");
            return Err(HostDenied::new(format!("no address records for {host}")));
        }

        for ip in &addresses {
            check_address(host, *ip)?;
        }

        debug!(host = %host, count = addresses.len(), "destination authorized");
        Ok(())
    }
}

fn check_address(host: &str, ip: IpAddr) -> Result<(), HostDenied> {
    let verdict = classify(ip);
    if verdict.is_public_unicast() {
        return Ok(());
    }

    warn!(host = %host, %ip, %verdict, "destination refused by IP range policy");
    Err(HostDenied::new(format!(
        "{host} resolves to {ip} ({verdict})"
    )))
}
