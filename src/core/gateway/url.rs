//! Hostname and protocol validation
//!
//! Parses an untrusted URL string and enforces the scheme and hostname
//! policy before any network activity. A [`CandidateUrl`] only exists
//! after those checks passed.

use thiserror::Error;
use url::Url;

/// Why a raw URL was refused before any DNS work.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlRejection {
    /// Not parseable as an absolute URL
    #[error("invalid URL")]
    Invalid,
    /// Scheme outside http/https (file, data, javascript, ftp, gopher, ...)
    #[error("unsafe protocol: {0}")]
    UnsafeProtocol(String),
    /// Hostname refused by policy before resolution
    #[error("blocked host: {0}")]
    BlockedHost(String),
}

/// A URL that passed scheme and hostname checks.
///
/// Invariant: the scheme is http or https and the host is neither empty nor
/// a localhost alias. Authorization of the resolved addresses is a separate,
/// per-connection step.
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    url: Url,
}

impl CandidateUrl {
    /// Parse and validate an absolute URL supplied by an untrusted user.
    pub fn parse(raw: &str) -> Result<Self, UrlRejection> {
        let url = Url::parse(raw).map_err(|_| UrlRejection::Invalid)?;

        // Url lowercases the scheme during parsing
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(UrlRejection::UnsafeProtocol(other.to_string())),
        }

        let host = url.host_str().ok_or(UrlRejection::Invalid)?;

        // Special-cased before any DNS call: resolvers disagree on this name
        if host == "localhost" || host.ends_with(".localhost") {
            return Err(UrlRejection::BlockedHost(host.to_string()));
        }

        Ok(Self { url })
    }

    /// Hostname (lowercased by the parser; IPv6 literals keep their brackets
    /// stripped).
    pub fn host(&self) -> &str {
        // Invariant: parse() rejected host-less URLs
        self.url.host_str().unwrap_or_default()
    }

    /// The underlying parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.url
    }

    /// Resolve a redirect Location against this URL.
    ///
    /// Handles relative Locations (`/newpath`, `newpath`, `//host/path`) per
    /// the usual base-URL rules. The result is a plain [`Url`]: redirect
    /// targets go back through [`CandidateUrl::parse`] before any connection.
    pub fn resolve_location(&self, location: &str) -> Option<Url> {
        self.url.join(location).ok()
    }
}

impl std::fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.url.fmt(f)
    }
}
