//! Status endpoints

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::api::state::AppState;

/// GET /api/status - Current state, reconciled with the live client
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.bridge.status().await;
    tracing::debug!(status = %snapshot.status, "status requested");
    Json(snapshot)
}

/// GET /api/qrcode - Pending QR code
pub async fn get_qrcode(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .bridge
        .qr_code()
        .map(|qrcode| Json(json!({ "qrcode": qrcode })))
}

/// GET /api/verify-connection - Probe the client and reconcile
pub async fn verify_connection(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.bridge.verify_connection().await)
}

/// GET /api/webhook/stats - Outbox counters
pub async fn webhook_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.bridge.relay_stats())
}
