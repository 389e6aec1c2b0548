//! REST endpoints
//!
//! - `GET /api/status`, `GET /api/qrcode`, `GET /api/verify-connection`
//! - `POST /api/connect`, `POST /api/disconnect`
//! - `POST /api/send`, `GET|DELETE /api/messages`, `GET /api/messages/:number`
//! - `POST /api/client/events` - driver event ingress

pub mod events;
pub mod messages;
pub mod session;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::types::BridgeError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>, code: &str) -> Self {
        Self {
            error: message.into(),
            code: code.to_string(),
        }
    }
}

impl BridgeError {
    /// HTTP status and stable code for this error
    pub fn status_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotConnected => (StatusCode::BAD_REQUEST, "NOT_CONNECTED"),
            Self::MissingFields => (StatusCode::BAD_REQUEST, "MISSING_FIELDS"),
            Self::InvalidNumber(_) => (StatusCode::BAD_REQUEST, "INVALID_NUMBER"),
            Self::QrUnavailable => (StatusCode::NOT_FOUND, "QR_UNAVAILABLE"),
            Self::InitializationFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INITIALIZATION_FAILED")
            }
            Self::TeardownFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TEARDOWN_FAILED"),
            Self::SendFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SEND_FAILED"),
        }
    }

    /// Message shown to API callers; client details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            Self::TeardownFailed(_) => "Failed to disconnect".to_string(),
            Self::SendFailed(_) => "Failed to send message".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_code();
        (status, Json(ApiError::new(self.public_message(), code))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ClientError;

    #[test]
    fn test_error_statuses() {
        assert_eq!(BridgeError::NotConnected.status_code().0, StatusCode::BAD_REQUEST);
        assert_eq!(BridgeError::QrUnavailable.status_code().0, StatusCode::NOT_FOUND);
        let err = BridgeError::TeardownFailed(ClientError::Rejected("locked".to_string()));
        assert_eq!(err.status_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_public_messages() {
        assert_eq!(BridgeError::NotConnected.public_message(), "WhatsApp client not connected");
        assert_eq!(BridgeError::QrUnavailable.public_message(), "QR code not available");
        let err = BridgeError::SendFailed(ClientError::Rejected("x".to_string()));
        assert_eq!(err.public_message(), "Failed to send message");
    }
}
