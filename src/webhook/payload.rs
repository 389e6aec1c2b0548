//! Webhook payload types

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::types::MessageData;
use crate::utils::current_iso8601;

/// Kinds of events relayed to the webhook
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    Connected,
    Disconnected,
    AuthFailure,
    Message,
    InitializationFailed,
}

/// Body POSTed to the webhook: `{event, data, timestamp}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub data: Value,
    /// RFC 3339 time the payload was built
    pub timestamp: String,
}

impl WebhookPayload {
    pub fn new(event: WebhookEvent, data: Value) -> Self {
        Self {
            event,
            data,
            timestamp: current_iso8601(),
        }
    }

    pub fn connected() -> Self {
        Self::new(WebhookEvent::Connected, Value::Null)
    }

    pub fn disconnected(reason: &str) -> Self {
        Self::new(WebhookEvent::Disconnected, json!({ "reason": reason }))
    }

    pub fn auth_failure(error: &str) -> Self {
        Self::new(WebhookEvent::AuthFailure, json!({ "error": error }))
    }

    pub fn initialization_failed(attempts: u32, error: &str) -> Self {
        Self::new(
            WebhookEvent::InitializationFailed,
            json!({ "attempts": attempts, "error": error }),
        )
    }

    pub fn message(data: &MessageData) -> Self {
        // MessageData only holds strings, numbers and bools
        let data = serde_json::to_value(data).unwrap_or(Value::Null);
        Self::new(WebhookEvent::Message, data)
    }

    /// Chat address of the other party of a message payload
    pub fn counterpart(&self) -> Option<&str> {
        if self.event != WebhookEvent::Message {
            return None;
        }
        let key = if self.data["fromMe"].as_bool().unwrap_or(false) {
            "to"
        } else {
            "from"
        };
        self.data[key].as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageSource;

    fn outgoing() -> MessageData {
        MessageData {
            from: "5511000@c.us".to_string(),
            to: Some("5511999@c.us".to_string()),
            body: "hi".to_string(),
            timestamp: 1_700_000_000,
            kind: "chat".to_string(),
            id: "ID1".to_string(),
            from_me: true,
            source: Some(MessageSource::Api),
            lead_id: Some(json!("lead-42")),
        }
    }

    #[test]
    fn test_connected_payload_shape() {
        let json = serde_json::to_value(WebhookPayload::connected()).unwrap();
        assert_eq!(json["event"], "connected");
        assert!(json["data"].is_null());
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn test_disconnected_carries_reason() {
        let payload = WebhookPayload::disconnected("NAVIGATION");
        assert_eq!(payload.event, WebhookEvent::Disconnected);
        assert_eq!(payload.data["reason"], "NAVIGATION");
    }

    #[test]
    fn test_message_payload() {
        let payload = WebhookPayload::message(&outgoing());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["event"], "message");
        assert_eq!(json["data"]["fromMe"], true);
        assert_eq!(json["data"]["source"], "api");
        assert_eq!(json["data"]["lead_id"], "lead-42");
    }

    #[test]
    fn test_counterpart() {
        let payload = WebhookPayload::message(&outgoing());
        assert_eq!(payload.counterpart(), Some("5511999@c.us"));

        let mut incoming = outgoing();
        incoming.from_me = false;
        assert_eq!(WebhookPayload::message(&incoming).counterpart(), Some("5511000@c.us"));

        assert_eq!(WebhookPayload::connected().counterpart(), None);
    }
}
