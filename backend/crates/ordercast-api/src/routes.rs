//! API routes configuration

use crate::handlers;
use actix_web::web;
use ordercast_commons::constants::API_VERSION;

/// Configure API routes for ordercast
///
/// All endpoints are scoped under the API version prefix (`/v1`):
/// - GET  /v1/api/subscribe - event stream for the authenticated recipient
/// - POST /v1/api/notifications - notify a recipient
/// - POST /v1/api/cluster/notify - peer fanout receive endpoint
/// - GET  /v1/api/healthcheck - health check endpoint
/// - GET  /v1/api/sessions - open sessions (localhost only)
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(&format!("/{}", API_VERSION)).service(
            web::scope("/api")
                .service(handlers::subscribe_handler)
                .service(handlers::notify_recipient)
                .service(handlers::cluster_notify)
                .service(handlers::healthcheck_handler)
                .service(handlers::sessions_handler),
        ),
    );
}
