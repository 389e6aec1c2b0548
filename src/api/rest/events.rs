//! Lifecycle event ingress from the automation driver

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use super::ApiError;
use crate::api::state::AppState;
use crate::client::ClientEvent;

/// POST /api/client/events - Queue one lifecycle event for the bridge
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ClientEvent>,
) -> impl IntoResponse {
    let name = event.name();
    match state.events.send(event).await {
        Ok(()) => {
            tracing::trace!(event = name, "client event queued");
            (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))).into_response()
        }
        Err(_) => {
            tracing::error!(event = name, "event loop stopped, client event lost");
            let error = ApiError::new("Event loop is not running", "UNAVAILABLE");
            (StatusCode::SERVICE_UNAVAILABLE, Json(error)).into_response()
        }
    }
}
