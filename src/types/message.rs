//! Message types shared by the client seam and the webhook relay

use serde::{Deserialize, Serialize};

/// A message as reported by the messaging client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub body: String,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub from_me: bool,
    /// Relay marker echoed back for messages sent through the API
    #[serde(default)]
    pub marker: Option<String>,
}

fn default_kind() -> String {
    "chat".to_string()
}

/// Where an outgoing message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// Sent through `POST /api/send`
    Api,
    /// Sent from the phone or another linked device
    External,
}

/// `data` of a `message` webhook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageData {
    pub from: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    pub body: String,
    /// Unix seconds
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub from_me: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<MessageSource>,
    #[serde(rename = "lead_id", skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<serde_json::Value>,
}

impl MessageData {
    /// Incoming message; `own_chat_id` fills a missing recipient
    pub fn incoming(message: &ClientMessage, own_chat_id: Option<String>) -> Self {
        Self {
            from: message.from.clone(),
            to: message.to.clone().or(own_chat_id),
            body: message.body.clone(),
            timestamp: message.timestamp,
            kind: message.kind.clone(),
            id: message.id.clone(),
            from_me: false,
            source: None,
            lead_id: None,
        }
    }

    /// Self-sent message observed on the create stream
    pub fn external(message: &ClientMessage) -> Self {
        Self {
            from: message.from.clone(),
            to: message.to.clone(),
            body: message.body.clone(),
            timestamp: message.timestamp,
            kind: message.kind.clone(),
            id: message.id.clone(),
            from_me: true,
            source: Some(MessageSource::External),
            lead_id: None,
        }
    }
}
