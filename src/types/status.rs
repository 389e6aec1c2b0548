//! Connection status of the messaging session

use std::fmt;

use serde::{Deserialize, Serialize};

/// Single authoritative connection status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No session; the starting state
    #[default]
    Disconnected,
    /// Client is starting up
    Initializing,
    /// Waiting for the QR code to be scanned
    QrPending,
    /// Pairing accepted, waiting for the client to become ready
    Authenticated,
    /// Session is live and can send messages
    Connected,
    /// Authentication or initialization failed
    Error,
}

impl ConnectionStatus {
    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Initializing => "initializing",
            Self::QrPending => "qr_pending",
            Self::Authenticated => "authenticated",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Whether `connect()` may start a fresh initialization from this status
    pub fn can_initialize(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Error)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&ConnectionStatus::QrPending).unwrap();
        assert_eq!(json, "\"qr_pending\"");
        assert_eq!(ConnectionStatus::Connected.to_string(), "connected");
    }

    #[test]
    fn test_default_is_disconnected() {
        assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn test_can_initialize() {
        assert!(ConnectionStatus::Disconnected.can_initialize());
        assert!(ConnectionStatus::Error.can_initialize());
        assert!(!ConnectionStatus::Initializing.can_initialize());
        assert!(!ConnectionStatus::Connected.can_initialize());
    }
}
