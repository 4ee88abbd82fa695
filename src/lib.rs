//! # readgate
//!
//! SSRF-safe fetch gateway for a read-aloud article service. End users
//! submit arbitrary URLs; `readgate` fetches the page so a downstream
//! extraction/TTS pipeline can turn it into audio, while guaranteeing the
//! server never contacts loopback, private, link-local, or otherwise
//! non-public destinations.
//!
//! ## What makes the fetch safe
//!
//! - Scheme and hostname policy before any network activity (http/https
//!   only, localhost aliases refused outright)
//! - Fresh DNS resolution and IP-range classification immediately before
//!   *every* connection, including every redirect hop, so a rebinding DNS
//!   answer cannot slip a private address between check and connect
//! - All resolved addresses must be public unicast; one bad record (or an
//!   empty/erroring resolution) rejects the host
//! - Automatic redirect-following disabled at the transport; the gateway
//!   observes each 3xx itself, bounded by a hop limit and one whole-call
//!   deadline
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use readgate::config::FetchConfig;
//! use readgate::core::gateway::{FetchOutcome, SafeFetcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetcher = SafeFetcher::new(FetchConfig::default()).unwrap();
//!
//!     match fetcher.fetch("https://example.com/article").await {
//!         FetchOutcome::Success { body, .. } => println!("{} bytes", body.len()),
//!         other => eprintln!("fetch refused: {:?}", other.class()),
//!     }
//! }
//! ```
//!
//! ## Gateway mode
//!
//! The `gateway` binary serves `POST /api/extract` with the same logic
//! behind a small actix-web surface; see [`server::run_server`].

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export the primary gateway surface
pub use crate::core::gateway::{FetchOutcome, IpRangeVerdict, OutcomeClass, SafeFetcher, classify};
pub use crate::utils::error::{GatewayError, Result};
