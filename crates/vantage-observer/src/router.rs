//! Axum router construction for the state API.
//!
//! Assembles all routes into a single [`Router`] with CORS, request
//! tracing, and a panic catcher that answers with a JSON 500.

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ObserverError;
use crate::handlers;
use crate::state::AppState;
use crate::tip;

/// Build the complete Axum router for the state API.
///
/// The router includes:
/// - `GET /` -- JSON route index
/// - `GET /state` -- snapshot with capped events
/// - `GET /inventory` -- inventory-only view
/// - `GET /events?n=` -- newest events
/// - `POST /tip` -- queue a tip (405 with `Allow: POST` otherwise)
///
/// Unknown paths get a JSON 404. CORS allows any origin so a local
/// dashboard or notebook can poll the API directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    with_middleware(routes()).with_state(state)
}

/// The route table without middleware or state.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/state", get(handlers::get_state))
        .route("/inventory", get(handlers::get_inventory))
        .route("/events", get(handlers::list_events))
        .route("/tip", post(tip::submit_tip).fallback(tip::wrong_method))
        .fallback(handlers::not_found)
}

/// Wrap `router` in the panic catcher, CORS, and request tracing.
pub fn with_middleware<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Convert a caught handler panic into a JSON 500.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    tracing::error!(detail, "Request handler panicked");
    ObserverError::Internal(detail.to_owned()).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use vantage_core::{StateStore, tip_channel};

    use super::*;

    async fn explode() -> &'static str {
        panic!("boom")
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn panic_payload_becomes_json_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"], "internal error: boom");
    }

    #[tokio::test]
    async fn owned_string_payload() {
        let response = panic_response(Box::new(String::from("index out of range")));
        let json = body_json(response).await;
        assert_eq!(json["error"], "internal error: index out of range");
    }

    #[tokio::test]
    async fn panicking_handler_answers_json_500_through_the_stack() {
        let (tips, _rx) = tip_channel(1);
        let state = Arc::new(AppState::new(Arc::new(StateStore::default()), tips));
        let router = with_middleware(routes().route("/explode", get(explode))).with_state(state);

        let response = router
            .clone()
            .oneshot(Request::get("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(content_type.contains("application/json"));
        let json = body_json(response).await;
        assert_eq!(json, serde_json::json!({"error": "internal error: boom"}));

        // The service keeps answering after a fault.
        let response = router
            .oneshot(Request::get("/state").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
