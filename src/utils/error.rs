//! Error types for the gateway

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
///
/// These are operational errors (startup, config, request plumbing), not
/// fetch verdicts: a blocked or failed fetch is a first-class
/// [`FetchOutcome`](crate::core::gateway::FetchOutcome), never an error.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// DNS resolver setup errors
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// Server lifecycle errors
    #[error("Server error: {0}")]
    Server(String),
}

impl GatewayError {
    /// Create a server lifecycle error
    pub fn server(message: impl Into<String>) -> Self {
        GatewayError::Server(message.into())
    }
}

impl From<crate::core::gateway::ResolveError> for GatewayError {
    fn from(e: crate::core::gateway::ResolveError) -> Self {
        GatewayError::Resolver(e.to_string())
    }
}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            GatewayError::Config(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIG_ERROR",
                self.to_string(),
            ),
            GatewayError::HttpClient(_) | GatewayError::Resolver(_) => (
                actix_web::http::StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "Upstream request failed".to_string(),
            ),
            GatewayError::Server(_) => (
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        HttpResponse::build(status_code).json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }))
    }
}
