//! Webhook delivery targets

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use tokio::sync::Notify;

use super::payload::WebhookPayload;
use crate::types::DeliveryError;

/// Something that can take one webhook payload
#[async_trait]
pub trait WebhookSink: Send + Sync {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), DeliveryError>;
}

/// POSTs payloads as JSON to a URL
pub struct HttpSink {
    http: Client,
    url: String,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WebhookSink for HttpSink {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        let response = self.http.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status.as_u16()))
        }
    }
}

/// Keeps every delivered payload in memory
///
/// Can be told to fail a number of deliveries first.
#[derive(Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<WebhookPayload>>,
    failures: Mutex<u32>,
    attempts: Mutex<u32>,
    notify: Notify,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` delivery attempts with a 503
    pub fn fail_next(&self, count: u32) {
        *self.failures.lock() = count;
    }

    pub fn delivered(&self) -> Vec<WebhookPayload> {
        self.delivered.lock().clone()
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.lock()
    }

    /// Wait until at least `count` payloads arrived or `timeout` passed
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<WebhookPayload> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.notify.notified();
            {
                let delivered = self.delivered.lock();
                if delivered.len() >= count {
                    return delivered.clone();
                }
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.delivered();
            }
        }
    }
}

#[async_trait]
impl WebhookSink for RecordingSink {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), DeliveryError> {
        *self.attempts.lock() += 1;
        {
            let mut failures = self.failures.lock();
            if *failures > 0 {
                *failures -= 1;
                return Err(DeliveryError::Status(503));
            }
        }
        self.delivered.lock().push(payload.clone());
        self.notify.notify_waiters();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_sink_fails_then_records() {
        let sink = RecordingSink::new();
        sink.fail_next(1);

        let payload = WebhookPayload::connected();
        assert!(matches!(
            sink.deliver(&payload).await,
            Err(DeliveryError::Status(503))
        ));
        assert!(sink.deliver(&payload).await.is_ok());
        assert_eq!(sink.attempts(), 2);
        assert_eq!(sink.delivered().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_times_out() {
        let sink = RecordingSink::new();
        let got = sink.wait_for(1, Duration::from_secs(1)).await;
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn test_http_sink_unreachable() {
        let sink = HttpSink::new("http://127.0.0.1:9/hook", Duration::from_secs(2)).unwrap();
        assert_eq!(sink.url(), "http://127.0.0.1:9/hook");
        assert!(matches!(
            sink.deliver(&WebhookPayload::connected()).await,
            Err(DeliveryError::Http(_))
        ));
    }
}
