//! Article extract endpoint
//!
//! `POST /api/extract` runs the SSRF-safe fetcher on a user-supplied URL
//! and maps the typed outcome onto HTTP statuses. Every security denial,
//! whatever its internal cause, surfaces as one generic restricted
//! response: callers (and attackers) cannot distinguish a malformed URL,
//! a blocked scheme, a failed resolution, or a private destination.

use crate::core::gateway::{FetchOutcome, OutcomeClass};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configure extract routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/extract", web::post().to(extract)));
}

/// Extract request body
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    /// Absolute URL supplied by the end user
    pub url: String,
}

/// Extract response payload
///
/// The fetched document text; paragraph extraction and synthesis happen
/// downstream.
#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    /// Raw document text
    pub content: String,
    /// Length of the document text in bytes
    pub content_length: usize,
    /// Caller-facing outcome class
    pub outcome: OutcomeClass,
}

/// Fetch a user-supplied URL through the security gateway
pub async fn extract(
    state: web::Data<AppState>,
    body: web::Json<ExtractRequest>,
) -> ActixResult<HttpResponse> {
    let url = body.url.trim();
    if url.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<ExtractResponse>::error("URL is required".into())));
    }

    let outcome = state.fetcher.fetch(url).await;
    Ok(respond(url, outcome))
}

/// Map a fetch outcome to the caller-facing HTTP response
fn respond(url: &str, outcome: FetchOutcome) -> HttpResponse {
    match outcome.class() {
        OutcomeClass::Success => {
            let FetchOutcome::Success { body, .. } = outcome else {
                unreachable!("Success class implies Success outcome");
            };
            info!(url = %url, bytes = body.len(), "extract fetch succeeded");
            HttpResponse::Ok().json(ApiResponse::success(ExtractResponse {
                content_length: body.len(),
                content: body,
                outcome: OutcomeClass::Success,
            }))
        }
        OutcomeClass::Restricted => {
            // Detail stays in server logs; the response is deliberately
            // uniform for all security denials
            warn!(url = %url, outcome = ?outcome, "extract fetch restricted");
            HttpResponse::Forbidden().json(ApiResponse::<ExtractResponse>::error(
                "URL is restricted for security reasons".into(),
            ))
        }
        OutcomeClass::AuthRequired => {
            let FetchOutcome::AuthRequired { status } = outcome else {
                unreachable!("AuthRequired class implies AuthRequired outcome");
            };
            let status = actix_web::http::StatusCode::from_u16(status)
                .unwrap_or(actix_web::http::StatusCode::UNAUTHORIZED);
            HttpResponse::build(status).json(ApiResponse::<ExtractResponse>::error(
                "Source requires authentication".into(),
            ))
        }
        OutcomeClass::Timeout => HttpResponse::RequestTimeout().json(
            ApiResponse::<ExtractResponse>::error(
                "Request timeout - URL took too long to fetch".into(),
            ),
        ),
        OutcomeClass::RedirectFailure => {
            warn!(url = %url, outcome = ?outcome, "extract fetch failed in redirect chain");
            HttpResponse::BadGateway().json(ApiResponse::<ExtractResponse>::error(
                "Could not follow the URL's redirects".into(),
            ))
        }
        OutcomeClass::UpstreamFailure => {
            let FetchOutcome::UpstreamError { status, .. } = &outcome else {
                unreachable!("UpstreamFailure class implies UpstreamError outcome");
            };
            warn!(url = %url, upstream_status = status, "extract fetch failed upstream");
            HttpResponse::BadGateway().json(ApiResponse::<ExtractResponse>::error(
                "The source site returned an error".into(),
            ))
        }
    }
}
