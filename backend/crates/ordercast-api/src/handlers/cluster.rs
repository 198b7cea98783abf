use actix_web::{post, web, HttpRequest, HttpResponse};
use ordercast_commons::ClusterEnvelope;
use ordercast_core::{AppContext, LiveError};
use serde_json::json;
use std::sync::Arc;

use crate::auth::verify_cluster_id;
use crate::error::ApiError;

/// POST /v1/api/cluster/notify - message forwarded by a peer's bus
///
/// Hands the envelope to the local bus exactly as if it had been published in
/// this process. A body that does not decode is answered with 422 so the
/// sender logs the protocol mismatch.
#[post("/cluster/notify")]
pub async fn cluster_notify(
    req: HttpRequest,
    envelope: web::Json<ClusterEnvelope>,
    app_context: web::Data<Arc<AppContext>>,
) -> Result<HttpResponse, ApiError> {
    let cluster_config = match &app_context.config().cluster {
        Some(config) => config,
        None => return Err(ApiError::NotFound),
    };

    verify_cluster_id(&req, &cluster_config.cluster_id)?;
    if envelope.cluster_id != cluster_config.cluster_id {
        return Err(ApiError::Unauthorized("Cluster id mismatch".to_string()));
    }

    match app_context
        .bus()
        .deliver(&envelope.topic, envelope.body.as_bytes())
    {
        Ok(delivered) => Ok(HttpResponse::Ok().json(json!({ "delivered": delivered }))),
        Err(LiveError::Codec(err)) => {
            log::error!(
                "Undecodable message from node {} on topic '{}': {}",
                envelope.origin_node,
                envelope.topic,
                err
            );
            Err(ApiError::Unprocessable(err.to_string()))
        },
        Err(err) => Err(err.into()),
    }
}
