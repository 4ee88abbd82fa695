//! Health check and status endpoints

use crate::server::routes::ApiResponse;
use actix_web::{HttpResponse, Result as ActixResult, web};
use std::borrow::Cow;
use tracing::debug;

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

/// Health status payload
#[derive(Debug, serde::Serialize)]
struct HealthStatus {
    status: Cow<'static, str>,
    timestamp: chrono::DateTime<chrono::Utc>,
    version: Cow<'static, str>,
}

/// Basic health check endpoint
///
/// The gateway holds no connections or state, so "running" is "healthy".
/// Used by load balancers and monitoring systems.
pub async fn health_check() -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let health_status = HealthStatus {
        status: Cow::Borrowed("healthy"),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(health_status)))
}

/// Build metadata payload
#[derive(Debug, serde::Serialize)]
struct VersionInfo {
    version: &'static str,
    git_hash: &'static str,
    build_time: &'static str,
}

/// Version and build info endpoint
async fn version_info() -> ActixResult<HttpResponse> {
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: env!("GIT_HASH"),
        build_time: env!("BUILD_TIME"),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(info)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_health_endpoint() {
        let app =
            test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["success"], true);
        assert_eq!(resp["data"]["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_version_endpoint() {
        let app =
            test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/version").to_request();
        let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(resp["data"]["version"], env!("CARGO_PKG_VERSION"));
    }
}
