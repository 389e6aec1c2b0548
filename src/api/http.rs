//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::{events, messages, session, status};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // The CRM frontend polls these endpoints from the browser
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(status::get_status))
        .route("/api/qrcode", get(status::get_qrcode))
        .route("/api/verify-connection", get(status::verify_connection))
        .route("/api/webhook/stats", get(status::webhook_stats))
        .route("/api/connect", post(session::connect))
        .route("/api/disconnect", post(session::disconnect))
        .route("/api/send", post(messages::send))
        .route(
            "/api/messages",
            get(messages::list_messages).delete(messages::clear_messages),
        )
        .route("/api/messages/:number", get(messages::list_messages_for))
        .route("/api/client/events", post(events::ingest))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScriptedClient;
    use crate::config::BridgeConfig;
    use crate::session::Bridge;
    use crate::webhook::WebhookRelay;
    use axum::body::Body;
    use axum::http::Request;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let bridge = Bridge::new(
            Arc::new(ScriptedClient::new()),
            WebhookRelay::disabled(),
            &BridgeConfig::default(),
        );
        let (tx, _rx) = mpsc::channel(8);
        let app = create_router(Arc::new(AppState::new(bridge, tx)));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }
}
