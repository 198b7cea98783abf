use actix_web::{post, web, HttpRequest, HttpResponse};
use ordercast_commons::RecipientId;
use ordercast_core::AppContext;
use serde_json::json;
use std::sync::Arc;

use crate::auth::{is_local_request, verify_cluster_id};
use crate::error::ApiError;
use crate::models::NotifyRequest;

/// POST /v1/api/notifications - notify a recipient
///
/// Used by the business services that produce order events. In cluster mode
/// the caller must present the cluster id; a standalone node only accepts
/// calls from localhost. Delivery is fire-and-forget, so success is 202.
#[post("/notifications")]
pub async fn notify_recipient(
    req: HttpRequest,
    body: web::Json<NotifyRequest>,
    app_context: web::Data<Arc<AppContext>>,
) -> Result<HttpResponse, ApiError> {
    match &app_context.config().cluster {
        Some(cluster) => verify_cluster_id(&req, &cluster.cluster_id)?,
        None if is_local_request(&req) => {},
        None => {
            return Err(ApiError::Forbidden(
                "Notify is localhost-only on a standalone node".to_string(),
            ))
        },
    }

    let NotifyRequest { recipient, payload } = body.into_inner();
    let recipient =
        RecipientId::try_new(recipient).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    app_context.dispatcher().notify(&recipient, &payload)?;

    Ok(HttpResponse::Accepted().json(json!({
        "status": "accepted",
        "recipient": recipient.as_str(),
        "order_id": payload.order_id,
    })))
}
