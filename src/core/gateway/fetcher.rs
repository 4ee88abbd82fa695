//! Redirect-following fetcher
//!
//! Orchestrates one gateway call: validate the URL, authorize the
//! destination with fresh DNS, connect with redirects disabled, and on
//! each 3xx re-validate the next hop before following it. One deadline
//! covers the whole call so a slow multi-hop chain cannot stretch the
//! budget, and a single hop counter bounds the chain.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::utils::error::GatewayError;

use super::authorize::DestinationAuthorizer;
use super::outcome::FetchOutcome;
use super::resolver::{DnsResolver, HickoryDnsResolver};
use super::transport::{HttpTransport, ReqwestTransport, TransportError};
use super::url::CandidateUrl;

/// SSRF-safe fetcher.
///
/// Each [`fetch`](SafeFetcher::fetch) call owns its transient session state
/// (current URL, hop count, deadline); nothing is shared across calls and
/// no authorization verdict outlives the single connection it guarded.
/// Concurrent calls for different end-user requests need no coordination.
pub struct SafeFetcher {
    authorizer: DestinationAuthorizer,
    transport: Arc<dyn HttpTransport>,
    config: FetchConfig,
}

impl SafeFetcher {
    /// Production wiring: system DNS + reqwest with redirects disabled.
    pub fn new(config: FetchConfig) -> Result<Self, GatewayError> {
        let resolver = HickoryDnsResolver::shared()?;
        let transport = ReqwestTransport::new(&config.user_agent)?;
        Ok(Self::with_parts(resolver, Arc::new(transport), config))
    }

    /// Assemble from injected capabilities (tests, alternative runtimes).
    pub fn with_parts(
        resolver: Arc<dyn DnsResolver>,
        transport: Arc<dyn HttpTransport>,
        config: FetchConfig,
    ) -> Self {
        Self {
            authorizer: DestinationAuthorizer::new(resolver),
            transport,
            config,
        }
    }

    /// Fetch a user-supplied URL, following up to `max_redirects` hops,
    /// re-authorizing the destination immediately before every connection.
    ///
    /// The deadline is set once for the entire call; on expiry the
    /// in-flight hop is aborted and no further hop is attempted.
    pub async fn fetch(&self, raw_url: &str) -> FetchOutcome {
        let deadline = Duration::from_millis(self.config.timeout_ms);
        match tokio::time::timeout(deadline, self.follow(raw_url)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(url = %raw_url, timeout_ms = self.config.timeout_ms, "fetch deadline expired");
                FetchOutcome::Timeout
            }
        }
    }

    /// The hop loop: Validating → Connecting → AwaitingResponse, looping
    /// back to Validating on each accepted redirect.
    async fn follow(&self, raw_url: &str) -> FetchOutcome {
        let mut current = raw_url.to_string();
        let mut hop_count: u32 = 0;

        loop {
            // Validating
            let candidate = match CandidateUrl::parse(&current) {
                Ok(candidate) => candidate,
                Err(rejection) => {
                    warn!(url = %current, hop = hop_count, %rejection, "URL rejected");
                    return rejection.into();
                }
            };

            if let Err(denied) = self.authorizer.authorize(candidate.host()).await {
                return FetchOutcome::Blocked {
                    reason: denied.reason,
                };
            }

            // Connecting
            debug!(url = %candidate, hop = hop_count, "destination authorized, connecting");
            let response = match self.transport.get(candidate.as_url()).await {
                Ok(response) => response,
                Err(TransportError::Timeout) => return FetchOutcome::Timeout,
                Err(TransportError::Request(message)) => {
                    warn!(url = %candidate, error = %message, "transport failure");
                    return FetchOutcome::UpstreamError {
                        status: 502,
                        status_text: message,
                    };
                }
            };

            // AwaitingResponse
            match response.status {
                401 | 403 => {
                    debug!(url = %candidate, status = response.status, "origin requires credentials");
                    return FetchOutcome::AuthRequired {
                        status: response.status,
                    };
                }
                _ if response.is_redirect() => {
                    let Some(location) = response.location.as_deref() else {
                        return FetchOutcome::MissingRedirectLocation;
                    };
                    // Relative Locations resolve against the current URL; an
                    // unusable Location is treated like an absent one
                    let Some(next) = candidate.resolve_location(location) else {
                        return FetchOutcome::MissingRedirectLocation;
                    };

                    hop_count += 1;
                    if hop_count > self.config.max_redirects {
                        warn!(url = %candidate, hops = hop_count, "redirect chain exceeds hop limit");
                        return FetchOutcome::TooManyRedirects;
                    }

                    debug!(from = %candidate, to = %next, hop = hop_count, "following redirect");
                    current = next.into();
                }
                200..=299 => {
                    debug!(url = %candidate, status = response.status, bytes = response.body.len(), "fetch succeeded");
                    return FetchOutcome::Success {
                        status: response.status,
                        body: response.body,
                    };
                }
                other => {
                    return FetchOutcome::UpstreamError {
                        status: other,
                        status_text: response.status_text,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gateway::resolver::MockDnsResolver;
    use crate::core::gateway::transport::{MockHttpTransport, TransportResponse};
    use std::net::{IpAddr, Ipv4Addr};

    fn public_resolver() -> MockDnsResolver {
        let mut resolver = MockDnsResolver::new();
        resolver
            .expect_resolve()
            .returning(|_| Ok(vec![IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]));
        resolver
    }

    fn response(status: u16, location: Option<&str>, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            status_text: String::new(),
            location: location.map(str::to_owned),
            body: body.to_string(),
        }
    }

    fn fetcher(resolver: MockDnsResolver, transport: MockHttpTransport) -> SafeFetcher {
        SafeFetcher::with_parts(
            Arc::new(resolver),
            Arc::new(transport),
            FetchConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(response(200, None, "<html>article</html>")));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/story")
            .await;

        match outcome {
            FetchOutcome::Success { status, body } => {
                assert_eq!(status, 200);
                assert_eq!(body, "<html>article</html>");
            }
            other => panic!("expected Success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_relative_location_resolves_against_current_url() {
        let mut transport = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|url| url.as_str() == "https://example.com/oldpath")
            .returning(|_| Ok(response(301, Some("/newpath"), "")));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|url| url.as_str() == "https://example.com/newpath")
            .returning(|_| Ok(response(200, None, "moved")));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/oldpath")
            .await;

        assert!(matches!(outcome, FetchOutcome::Success { .. }));
    }

    #[tokio::test]
    async fn test_hop_limit_stops_sixth_redirect_connection() {
        // Every hop redirects; with max_redirects=5 the fetcher makes the
        // initial connection plus five redirect connections, then gives up
        // without connecting to the sixth redirect target.
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(6)
            .returning(|url| {
                let hop: u32 = url.path().trim_start_matches("/hop").parse().unwrap_or(0);
                Ok(response(
                    302,
                    Some(&format!("https://example.com/hop{}", hop + 1)),
                    "",
                ))
            });

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/hop0")
            .await;

        assert!(matches!(outcome, FetchOutcome::TooManyRedirects));
    }

    #[tokio::test]
    async fn test_redirect_to_private_ip_is_blocked_without_connecting() {
        // The redirect response itself comes from an authorized host; its
        // Location points into RFC 1918 space. The private target must never
        // be connected to, and its body never read.
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .withf(|url| url.host_str() == Some("example.com"))
            .returning(|_| Ok(response(302, Some("http://192.168.1.1/admin"), "")));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/")
            .await;

        match outcome {
            FetchOutcome::Blocked { reason } => assert!(reason.contains("192.168.1.1")),
            other => panic!("expected Blocked, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multi_hop_chain_ending_private_is_blocked() {
        let mut transport = MockHttpTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|url| url.host_str() == Some("a.example"))
            .returning(|_| Ok(response(301, Some("https://b.example/"), "")));
        transport
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|url| url.host_str() == Some("b.example"))
            .returning(|_| Ok(response(302, Some("http://192.168.1.1/admin"), "")));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://a.example/")
            .await;

        assert!(matches!(outcome, FetchOutcome::Blocked { .. }));
    }

    #[tokio::test]
    async fn test_metadata_endpoint_blocked_without_dns_or_connection() {
        // Literal-IP host: classification runs directly, no DNS step, and
        // the transport is never touched
        let resolver = MockDnsResolver::new();
        let transport = MockHttpTransport::new();

        let outcome = fetcher(resolver, transport)
            .fetch("http://169.254.169.254/latest/meta-data/")
            .await;

        assert!(matches!(outcome, FetchOutcome::Blocked { .. }));
    }

    #[tokio::test]
    async fn test_unsafe_scheme_and_localhost_rejected_without_network() {
        let fetcher = fetcher(MockDnsResolver::new(), MockHttpTransport::new());

        assert!(matches!(
            fetcher.fetch("file:///etc/passwd").await,
            FetchOutcome::UnsafeProtocol { .. }
        ));
        assert!(matches!(
            fetcher.fetch("http://test.localhost/").await,
            FetchOutcome::Blocked { .. }
        ));
        assert!(matches!(
            fetcher.fetch("not a url").await,
            FetchOutcome::InvalidUrl
        ));
    }

    #[tokio::test]
    async fn test_401_from_authorized_host_is_auth_required() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(response(401, None, "")));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/paywalled")
            .await;

        assert!(matches!(
            outcome,
            FetchOutcome::AuthRequired { status: 401 }
        ));
    }

    #[tokio::test]
    async fn test_redirect_without_location() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(response(302, None, "")));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/")
            .await;

        assert!(matches!(outcome, FetchOutcome::MissingRedirectLocation));
    }

    #[tokio::test]
    async fn test_upstream_error_carries_status() {
        let mut transport = MockHttpTransport::new();
        transport.expect_get().times(1).returning(|_| {
            Ok(TransportResponse {
                status: 500,
                status_text: "Internal Server Error".into(),
                location: None,
                body: String::new(),
            })
        });

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/")
            .await;

        match outcome {
            FetchOutcome::UpstreamError {
                status,
                status_text,
            } => {
                assert_eq!(status, 500);
                assert_eq!(status_text, "Internal Server Error");
            }
            other => panic!("expected UpstreamError, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_deadline_covers_the_whole_call() {
        // Each hop responds just under the per-hop budget, but the chain as
        // a whole overruns the single call deadline
        struct SlowRedirectTransport;

        #[async_trait::async_trait]
        impl HttpTransport for SlowRedirectTransport {
            async fn get(
                &self,
                _url: &url::Url,
            ) -> Result<TransportResponse, TransportError> {
                tokio::time::sleep(Duration::from_millis(3000)).await;
                Ok(response(302, Some("https://example.com/next"), ""))
            }
        }

        let config = FetchConfig {
            timeout_ms: 8000,
            ..FetchConfig::default()
        };
        let fetcher = SafeFetcher::with_parts(
            Arc::new(public_resolver()),
            Arc::new(SlowRedirectTransport),
            config,
        );

        let outcome = fetcher.fetch("https://example.com/").await;
        assert!(matches!(outcome, FetchOutcome::Timeout));
    }

    #[tokio::test]
    async fn test_transport_failure_maps_to_upstream_error() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Err(TransportError::Request("connection refused".into())));

        let outcome = fetcher(public_resolver(), transport)
            .fetch("https://example.com/")
            .await;

        assert!(matches!(
            outcome,
            FetchOutcome::UpstreamError { status: 502, .. }
        ));
    }
}
