//! HTTP transport seam
//!
//! One GET per hop, with automatic redirect-following disabled at the
//! client level. The fetcher must observe every 3xx itself; an underlying
//! client that chased redirects would connect to unauthorized hosts before
//! validation could run.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use thiserror::Error;
use url::Url;

/// One hop's response, already drained.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,
    /// Canonical reason phrase for the status
    pub status_text: String,
    /// Raw Location header, if present
    pub location: Option<String>,
    /// Response body text
    pub body: String,
}

impl TransportResponse {
    pub fn is_redirect(&self) -> bool {
        (300..=399).contains(&self.status)
    }
}

/// Transport-level failure for a single hop.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request exceeded a transport deadline
    #[error("request timed out")]
    Timeout,
    /// Connect/TLS/protocol failure with no HTTP status
    #[error("request failed: {0}")]
    Request(String),
}

/// Capability to perform one redirect-free HTTP round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError>;
}

/// Production transport on reqwest.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with redirect-following disabled and a fixed
    /// outbound identification string.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    ///
    /// The caller is responsible for having disabled redirects; used by
    /// integration tests that add address overrides.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown Status")
                .to_string(),
            location,
            body,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Request(e.to_string())
    }
}
