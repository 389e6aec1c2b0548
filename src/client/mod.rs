//! Messaging client seam
//!
//! The browser-automation client that actually holds the WhatsApp session
//! lives outside this crate. The bridge talks to it through
//! [`MessagingClient`] and consumes its lifecycle notifications as
//! [`ClientEvent`] values.
//!
//! ## Implementations
//! - [`DriverClient`] - JSON over HTTP to an external automation driver
//! - [`ScriptedClient`] - in-process client with programmable outcomes

pub mod driver;
pub mod scripted;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{AccountInfo, ClientMessage, ClientResult};

pub use driver::DriverClient;
pub use scripted::ScriptedClient;

/// Lifecycle notifications emitted by the messaging client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// A pairing QR code is available
    Qr { qr: String },

    /// Startup progress
    LoadingScreen {
        #[serde(default)]
        percent: u8,
        #[serde(default)]
        message: String,
    },

    /// Pairing accepted
    Authenticated,

    /// Pairing or session restore rejected
    AuthFailure {
        #[serde(default)]
        error: String,
    },

    /// Session is usable
    Ready,

    /// Session dropped
    Disconnected {
        #[serde(default)]
        reason: String,
    },

    /// Raw connection state change reported by the client
    ChangeState { state: String },

    /// A message was received
    Message { message: ClientMessage },

    /// A message was created on this account, by any device
    MessageCreate { message: ClientMessage },
}

impl ClientEvent {
    /// Event name, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Self::Qr { .. } => "qr",
            Self::LoadingScreen { .. } => "loading_screen",
            Self::Authenticated => "authenticated",
            Self::AuthFailure { .. } => "auth_failure",
            Self::Ready => "ready",
            Self::Disconnected { .. } => "disconnected",
            Self::ChangeState { .. } => "change_state",
            Self::Message { .. } => "message",
            Self::MessageCreate { .. } => "message_create",
        }
    }
}

/// Options attached to an outgoing message
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SendOptions {
    /// Relay marker the client must echo on the matching `message_create`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
}

/// Result of a successful send
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
}

/// A contact known to the client
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub number: Option<String>,
}

/// The external messaging client that owns the live session
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Start the session; lifecycle events follow asynchronously
    async fn initialize(&self) -> ClientResult<()>;

    /// Tear the session down
    async fn destroy(&self) -> ClientResult<()>;

    /// Send a text message to a chat address
    async fn send_message(
        &self,
        chat_id: &str,
        body: &str,
        options: SendOptions,
    ) -> ClientResult<SentMessage>;

    /// Identity of the logged-in account
    async fn account_info(&self) -> ClientResult<AccountInfo>;

    /// Whether the live handle reports a usable session
    async fn is_ready(&self) -> bool;

    /// Whether `chat_id` is a registered user; succeeds only on a live session
    async fn is_registered_user(&self, chat_id: &str) -> ClientResult<bool>;

    /// Look up a contact by chat address
    async fn contact(&self, chat_id: &str) -> ClientResult<Option<Contact>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_parsing() {
        let json = r#"{"type":"qr","qr":"ABC"}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, ClientEvent::Qr { qr: "ABC".to_string() });

        let json = r#"{"type":"disconnected"}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, ClientEvent::Disconnected { ref reason } if reason.is_empty()));
    }

    #[test]
    fn test_message_create_parsing() {
        let json = r#"{"type":"message_create","message":{"id":"X","from":"55@c.us","timestamp":5,"fromMe":true,"marker":"relay-1"}}"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        match event {
            ClientEvent::MessageCreate { message } => {
                assert!(message.from_me);
                assert_eq!(message.marker.as_deref(), Some("relay-1"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_event_names() {
        assert_eq!(ClientEvent::Ready.name(), "ready");
        assert_eq!(
            ClientEvent::ChangeState { state: "CONFLICT".to_string() }.name(),
            "change_state"
        );
    }
}
