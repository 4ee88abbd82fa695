//! Fetch security gateway
//!
//! Fetches third-party pages whose URLs come from untrusted end users,
//! defeating SSRF and DNS-rebinding: scheme/hostname validation, fresh DNS
//! resolution and IP-range authorization immediately before every
//! connection (including every redirect hop), a bounded redirect chain,
//! and a single whole-call deadline.

pub mod authorize;
pub mod classify;
pub mod fetcher;
pub mod outcome;
pub mod resolver;
pub mod transport;
pub mod url;

pub use authorize::{DestinationAuthorizer, HostDenied};
pub use classify::{IpRangeVerdict, classify};
pub use fetcher::SafeFetcher;
pub use outcome::{FetchOutcome, OutcomeClass};
pub use resolver::{DnsResolver, HickoryDnsResolver, ResolveError};
pub use transport::{HttpTransport, ReqwestTransport, TransportError, TransportResponse};
pub use url::{CandidateUrl, UrlRejection};
