//! Fetch outcomes and their caller-facing classification

use serde::Serialize;

use super::url::UrlRejection;

/// Terminal result of one gateway fetch.
///
/// Every variant is final: the gateway never retries internally. A blocked
/// destination cannot become fetchable by retrying, and re-probing it would
/// only help an attacker map internal topology; transient-error retry
/// policy belongs to callers.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// 2xx response from an authorized destination
    Success {
        status: u16,
        body: String,
    },
    /// 401/403 from an authorized destination. The origin legitimately
    /// refused for lack of credentials; distinct from Blocked.
    AuthRequired {
        status: u16,
    },
    /// Destination refused by the IP range policy, at any hop
    Blocked {
        reason: String,
    },
    /// Input was not an absolute URL
    InvalidUrl,
    /// Scheme outside http/https
    UnsafeProtocol {
        scheme: String,
    },
    /// Redirect chain exceeded the hop limit
    TooManyRedirects,
    /// 3xx response without a usable Location header
    MissingRedirectLocation,
    /// The overall deadline expired
    Timeout,
    /// Any other terminal response or transport failure
    UpstreamError {
        status: u16,
        status_text: String,
    },
}

impl From<UrlRejection> for FetchOutcome {
    fn from(rejection: UrlRejection) -> Self {
        match rejection {
            UrlRejection::Invalid => FetchOutcome::InvalidUrl,
            UrlRejection::UnsafeProtocol(scheme) => FetchOutcome::UnsafeProtocol { scheme },
            UrlRejection::BlockedHost(host) => FetchOutcome::Blocked {
                reason: format!("host {host} is blocked"),
            },
        }
    }
}

/// Caller-facing classification of a [`FetchOutcome`].
///
/// InvalidUrl, UnsafeProtocol and Blocked deliberately collapse into one
/// `Restricted` class: separating "DNS failed" from "resolved to a private
/// IP" would hand an attacker an oracle for which internal hosts exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    Success,
    Restricted,
    AuthRequired,
    Timeout,
    RedirectFailure,
    UpstreamFailure,
}

impl FetchOutcome {
    /// Collapse to the caller-facing class.
    pub fn class(&self) -> OutcomeClass {
        match self {
            FetchOutcome::Success { .. } => OutcomeClass::Success,
            FetchOutcome::AuthRequired { .. } => OutcomeClass::AuthRequired,
            FetchOutcome::Blocked { .. }
            | FetchOutcome::InvalidUrl
            | FetchOutcome::UnsafeProtocol { .. } => OutcomeClass::Restricted,
            FetchOutcome::Timeout => OutcomeClass::Timeout,
            FetchOutcome::TooManyRedirects | FetchOutcome::MissingRedirectLocation => {
                OutcomeClass::RedirectFailure
            }
            FetchOutcome::UpstreamError { .. } => OutcomeClass::UpstreamFailure,
        }
    }
}
