//! Response shapes returned by bridge operations

use serde::Serialize;

use crate::types::{AccountInfo, ConnectionStatus, SessionState};
use crate::utils::to_iso8601;

/// `GET /api/status` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub status: ConnectionStatus,
    /// When the session connected, RFC 3339
    pub timestamp: Option<String>,
    /// Account identity, only while connected
    pub info: Option<AccountInfo>,
    /// Reason of the last auth or init failure
    #[serde(rename = "lastError", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<&SessionState> for StatusSnapshot {
    fn from(state: &SessionState) -> Self {
        let connected = state.status() == ConnectionStatus::Connected;
        Self {
            status: state.status(),
            timestamp: state.connected_at().map(to_iso8601),
            info: if connected {
                Some(state.account().cloned().unwrap_or_default())
            } else {
                None
            },
            last_error: state.last_error().map(str::to_string),
        }
    }
}

/// `GET /api/verify-connection` body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyReport {
    pub status: ConnectionStatus,
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<AccountInfo>,
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/send` success body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub success: bool,
    /// Number as the caller gave it
    pub to: String,
    pub status: &'static str,
    pub message_id: String,
    /// Unix seconds
    pub timestamp: i64,
}
