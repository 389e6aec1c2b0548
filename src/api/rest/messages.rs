//! Message endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::state::AppState;
use crate::types::BridgeError;

/// Body of `POST /api/send`
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub number: Option<String>,
    pub message: Option<String>,
    /// CRM lead to correlate the relayed message with
    #[serde(default)]
    pub lead_id: Option<Value>,
}

/// POST /api/send - Send a text message
pub async fn send(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SendRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unreadable send request");
            SendRequest {
                number: None,
                message: None,
                lead_id: None,
            }
        }
    };

    let number = request.number.unwrap_or_default();
    let message = request.message.unwrap_or_default();

    match state.bridge.send_message(&number, &message, request.lead_id).await {
        Ok(receipt) => Json(receipt).into_response(),
        Err(e @ BridgeError::SendFailed(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "error": e.public_message() })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/messages - No history is kept
pub async fn list_messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.bridge.list_messages())
}

/// GET /api/messages/:number - No history is kept
pub async fn list_messages_for(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> impl IntoResponse {
    Json(state.bridge.list_messages_for(&number))
}

/// DELETE /api/messages - Nothing to clear
pub async fn clear_messages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.bridge.clear_messages())
}
