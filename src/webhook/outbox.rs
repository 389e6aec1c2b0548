//! Bounded-retry webhook outbox
//!
//! `relay()` never blocks the caller: payloads go into a bounded channel
//! and a single worker task delivers them in order. A payload is tried up
//! to `max_attempts` times; after that it is dropped and counted as failed.
//! A full queue drops the new payload and counts it as dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc;

use super::payload::WebhookPayload;
use super::sink::WebhookSink;

/// Retry settings for one payload
#[derive(Clone, Debug)]
pub struct DeliveryPolicy {
    pub max_attempts: u32,
    /// Pause after the first failure; doubles on each further failure
    pub retry_delay: Duration,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }
}

#[derive(Default)]
struct Counters {
    enqueued: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Point-in-time outbox counters
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelayStats {
    pub enabled: bool,
    pub enqueued: u64,
    pub delivered: u64,
    pub failed: u64,
    pub dropped: u64,
}

/// Handle used by the bridge to relay payloads
pub struct WebhookRelay {
    tx: Option<mpsc::Sender<WebhookPayload>>,
    counters: Arc<Counters>,
}

impl WebhookRelay {
    /// A relay that accepts and discards everything (no webhook configured)
    pub fn disabled() -> Self {
        Self {
            tx: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Spawn the delivery worker on the current runtime
    pub fn spawn(sink: Arc<dyn WebhookSink>, policy: DeliveryPolicy, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let counters = Arc::new(Counters::default());
        let worker = DeliveryWorker {
            sink,
            policy,
            counters: counters.clone(),
        };
        tokio::spawn(worker.run(rx));

        Self {
            tx: Some(tx),
            counters,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a payload for delivery
    pub fn relay(&self, payload: WebhookPayload) {
        let Some(tx) = &self.tx else {
            return;
        };

        match tx.try_send(payload) {
            Ok(()) => {
                self.counters.enqueued.fetch_add(1, Ordering::Relaxed);
            }
            Err(mpsc::error::TrySendError::Full(payload)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(event = ?payload.event, "webhook queue full, payload dropped");
            }
            Err(mpsc::error::TrySendError::Closed(payload)) => {
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::error!(event = ?payload.event, "webhook worker stopped, payload dropped");
            }
        }
    }

    pub fn stats(&self) -> RelayStats {
        RelayStats {
            enabled: self.is_enabled(),
            enqueued: self.counters.enqueued.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

struct DeliveryWorker {
    sink: Arc<dyn WebhookSink>,
    policy: DeliveryPolicy,
    counters: Arc<Counters>,
}

impl DeliveryWorker {
    async fn run(self, mut rx: mpsc::Receiver<WebhookPayload>) {
        while let Some(payload) = rx.recv().await {
            self.deliver(&payload).await;
        }
        tracing::debug!("webhook worker exiting");
    }

    async fn deliver(&self, payload: &WebhookPayload) {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut delay = self.policy.retry_delay;

        for attempt in 1..=max_attempts {
            match self.sink.deliver(payload).await {
                Ok(()) => {
                    self.counters.delivered.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(event = ?payload.event, attempt, "webhook delivered");
                    return;
                }
                Err(e) if attempt < max_attempts => {
                    tracing::warn!(event = ?payload.event, attempt, error = %e, "webhook delivery failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => {
                    self.counters.failed.fetch_add(1, Ordering::Relaxed);
                    tracing::error!(event = ?payload.event, attempts = attempt, error = %e, "webhook delivery gave up");
                }
            }
        }
    }
}
