//! Session control endpoints

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::api::state::AppState;

/// POST /api/connect - Start a session unless one is starting or live
pub async fn connect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let status = state.bridge.connect().await;
    Json(json!({ "status": status }))
}

/// POST /api/disconnect - Tear the session down
pub async fn disconnect(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .bridge
        .disconnect()
        .await
        .map(|()| Json(json!({ "status": "disconnected" })))
}
