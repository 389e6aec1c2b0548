//! Contact enrichment for message payloads
//!
//! Wraps another sink and adds `contactName` / `contactNumber` to `message`
//! payloads before handing them on. Lookup failures are logged and the
//! payload goes out unenriched.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::payload::WebhookPayload;
use super::sink::WebhookSink;
use crate::client::MessagingClient;
use crate::types::DeliveryError;

pub struct ContactEnricher {
    inner: Arc<dyn WebhookSink>,
    client: Arc<dyn MessagingClient>,
}

impl ContactEnricher {
    pub fn new(inner: Arc<dyn WebhookSink>, client: Arc<dyn MessagingClient>) -> Self {
        Self { inner, client }
    }

    async fn enrich(&self, payload: &WebhookPayload) -> Option<WebhookPayload> {
        let chat_id = payload.counterpart()?;
        let contact = match self.client.contact(chat_id).await {
            Ok(Some(contact)) => contact,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "contact lookup failed");
                return None;
            }
        };

        let mut enriched = payload.clone();
        if let Value::Object(data) = &mut enriched.data {
            if let Some(name) = contact.name {
                data.insert("contactName".to_string(), Value::String(name));
            }
            if let Some(number) = contact.number {
                data.insert("contactNumber".to_string(), Value::String(number));
            }
        }
        Some(enriched)
    }
}

#[async_trait]
impl WebhookSink for ContactEnricher {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        match self.enrich(payload).await {
            Some(enriched) => self.inner.deliver(&enriched).await,
            None => self.inner.deliver(payload).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Contact, ScriptedClient};
    use crate::types::MessageData;
    use crate::webhook::RecordingSink;

    fn incoming_from(from: &str) -> WebhookPayload {
        WebhookPayload::message(&MessageData {
            from: from.to_string(),
            to: None,
            body: "oi".to_string(),
            timestamp: 1,
            kind: "chat".to_string(),
            id: "M1".to_string(),
            from_me: false,
            source: None,
            lead_id: None,
        })
    }

    fn setup() -> (Arc<RecordingSink>, Arc<ScriptedClient>, ContactEnricher) {
        let sink = Arc::new(RecordingSink::new());
        let client = Arc::new(ScriptedClient::new());
        let enricher = ContactEnricher::new(sink.clone(), client.clone());
        (sink, client, enricher)
    }

    #[tokio::test]
    async fn test_known_contact_is_added() {
        let (sink, client, enricher) = setup();
        client.add_contact(
            "5511777@c.us",
            Contact {
                name: Some("Maria".to_string()),
                number: Some("5511777".to_string()),
            },
        );

        enricher.deliver(&incoming_from("5511777@c.us")).await.unwrap();

        let delivered = sink.delivered();
        assert_eq!(delivered[0].data["contactName"], "Maria");
        assert_eq!(delivered[0].data["contactNumber"], "5511777");
    }

    #[tokio::test]
    async fn test_unknown_contact_passes_through() {
        let (sink, _client, enricher) = setup();
        let payload = incoming_from("5511666@c.us");

        enricher.deliver(&payload).await.unwrap();

        assert_eq!(sink.delivered(), vec![payload]);
    }

    #[tokio::test]
    async fn test_non_message_events_untouched() {
        let (sink, _client, enricher) = setup();
        let payload = WebhookPayload::disconnected("LOGOUT");

        enricher.deliver(&payload).await.unwrap();

        assert_eq!(sink.delivered(), vec![payload]);
    }
}
