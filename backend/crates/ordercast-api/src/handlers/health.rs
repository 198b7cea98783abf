use actix_web::{get, web, HttpRequest, HttpResponse};
use ordercast_commons::constants::API_VERSION;
use ordercast_core::AppContext;
use serde_json::json;
use std::sync::Arc;

use crate::auth::is_local_request;
use crate::error::ApiError;
use crate::models::HealthResponse;

const BUILD_DATE: &str = env!("BUILD_DATE");

/// GET /v1/api/healthcheck - liveness plus live delivery counters
#[get("/healthcheck")]
pub async fn healthcheck_handler(app_context: web::Data<Arc<AppContext>>) -> HttpResponse {
    let status = if app_context.sessions().is_shutting_down() {
        "shutting_down"
    } else {
        "healthy"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: app_context.server_version().to_string(),
        api_version: API_VERSION.to_string(),
        build_date: BUILD_DATE.to_string(),
        node_id: app_context.node_id().to_string(),
        is_cluster_mode: app_context.config().cluster.is_some(),
        open_sessions: app_context.registry().len(),
        open_streams: app_context.sessions().open_streams(),
        subscribed_topics: app_context.subscriptions().len(),
        uptime_seconds: app_context.uptime_secs(),
    })
}

/// GET /v1/api/sessions - sessions registered on this node
///
/// Access is restricted to localhost: the listing exposes recipient identities.
#[get("/sessions")]
pub async fn sessions_handler(
    req: HttpRequest,
    app_context: web::Data<Arc<AppContext>>,
) -> Result<HttpResponse, ApiError> {
    if !is_local_request(&req) {
        return Err(ApiError::Forbidden(
            "Session listing is localhost-only".to_string(),
        ));
    }

    let sessions: Vec<serde_json::Value> = app_context
        .registry()
        .snapshot()
        .iter()
        .map(|snapshot| snapshot.to_json())
        .collect();

    Ok(HttpResponse::Ok().json(json!({
        "node_id": app_context.node_id(),
        "count": sessions.len(),
        "sessions": sessions,
    })))
}
