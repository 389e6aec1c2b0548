//! Outbound webhook relay
//!
//! Every relayed occurrence is POSTed as `{event, data, timestamp}`.
//!
//! ## Pieces
//! - [`WebhookPayload`] - the body and its builders
//! - [`WebhookSink`] - a delivery target ([`HttpSink`], [`RecordingSink`])
//! - [`ContactEnricher`] - sink decorator adding contact details to messages
//! - [`WebhookRelay`] - non-blocking bounded-retry outbox in front of a sink

pub mod enrich;
pub mod outbox;
pub mod payload;
pub mod sink;

use std::sync::Arc;

use crate::client::MessagingClient;
use crate::config::BridgeConfig;
use crate::types::DeliveryError;

pub use enrich::ContactEnricher;
pub use outbox::{DeliveryPolicy, RelayStats, WebhookRelay};
pub use payload::{WebhookEvent, WebhookPayload};
pub use sink::{HttpSink, RecordingSink, WebhookSink};

/// Build the relay described by `config`.
///
/// Without a webhook URL the relay is disabled. Otherwise the HTTP sink is
/// wrapped in a [`ContactEnricher`] backed by `client`.
pub fn build_relay(
    config: &BridgeConfig,
    client: Arc<dyn MessagingClient>,
) -> Result<WebhookRelay, DeliveryError> {
    let Some(url) = config.webhook_url.as_deref() else {
        tracing::info!("WEBHOOK_URL not set, webhook relay disabled");
        return Ok(WebhookRelay::disabled());
    };

    let http: Arc<dyn WebhookSink> = Arc::new(HttpSink::new(url, config.webhook_timeout)?);
    let sink: Arc<dyn WebhookSink> = Arc::new(ContactEnricher::new(http, client));
    let policy = DeliveryPolicy {
        max_attempts: config.webhook_max_attempts,
        ..Default::default()
    };

    tracing::info!(url, "webhook relay enabled");
    Ok(WebhookRelay::spawn(sink, policy, config.webhook_queue_capacity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ScriptedClient;

    #[tokio::test]
    async fn test_build_relay_disabled_without_url() {
        let config = BridgeConfig::default();
        let relay = build_relay(&config, Arc::new(ScriptedClient::new())).unwrap();
        assert!(!relay.is_enabled());
    }

    #[tokio::test]
    async fn test_build_relay_enabled_with_url() {
        let config = BridgeConfig {
            webhook_url: Some("http://127.0.0.1:9/hook".to_string()),
            ..Default::default()
        };
        let relay = build_relay(&config, Arc::new(ScriptedClient::new())).unwrap();
        assert!(relay.is_enabled());
    }
}
