use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse};
use ordercast_core::AppContext;
use std::sync::Arc;

use crate::auth::resolve_identity;
use crate::error::ApiError;

/// GET /v1/api/subscribe - open the recipient's event stream
///
/// The response stays open until the client disconnects, the idle timeout
/// elapses or the server shuts down. The first event is the `connect`
/// handshake; notifications follow as `ordered` events.
#[get("/subscribe")]
pub async fn subscribe_handler(
    req: HttpRequest,
    app_context: web::Data<Arc<AppContext>>,
) -> Result<HttpResponse, ApiError> {
    let identity_header = &app_context.config().auth.identity_header;
    let recipient = resolve_identity(&req, identity_header)?;

    let stream = app_context.sessions().open_session(recipient)?;

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .insert_header(("X-Accel-Buffering", "no"))
        .streaming(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::standalone_context;
    use crate::routes::configure_routes;
    use actix_web::body::MessageBody;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use futures_util::future::poll_fn;
    use ordercast_commons::RecipientId;
    use std::pin::Pin;

    #[actix_rt::test]
    async fn test_missing_identity_is_unauthorized() {
        let ctx = standalone_context();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/v1/api/subscribe").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(ctx.registry().is_empty());
    }

    #[actix_rt::test]
    async fn test_subscribe_streams_handshake() {
        let ctx = standalone_context();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/api/subscribe")
            .insert_header(("X-Authenticated-User", "a@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
        assert!(ctx.registry().lookup(&RecipientId::new("a@x.com")).is_some());
        assert!(ctx.subscriptions().is_subscribed(&RecipientId::new("a@x.com")));

        let mut body = resp.into_body();
        let chunk = poll_fn(|cx| Pin::new(&mut body).poll_next(cx))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&chunk[..], b"event: connect\ndata: connected!\n\n");

        // Client goes away: the session leaves the registry
        drop(body);
        assert!(ctx.registry().is_empty());
    }

    #[actix_rt::test]
    async fn test_subscribe_refused_during_shutdown() {
        let ctx = standalone_context();
        ctx.sessions().shutdown();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx.clone()))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/v1/api/subscribe")
            .insert_header(("X-Authenticated-User", "a@x.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
