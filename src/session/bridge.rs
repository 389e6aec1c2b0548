//! The connection-state relay

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::dedup::SentRegistry;
use super::machine::next_status;
use super::report::{SendReceipt, StatusSnapshot, VerifyReport};
use super::retry::RetryPolicy;
use crate::client::{ClientEvent, MessagingClient, SendOptions};
use crate::config::BridgeConfig;
use crate::types::{
    AccountInfo, BridgeError, BridgeResult, ClientMessage, ConnectionStatus, MessageData,
    MessageSource, SessionState,
};
use crate::utils::{current_timestamp, normalize_chat_id};
use crate::webhook::{RelayStats, WebhookPayload, WebhookRelay};

/// Chat address used to probe whether the session is authenticated
const PROBE_CHAT_ID: &str = "777777777777@c.us";

const NO_HISTORY_NOTE: &str = "This bridge does not store message history";

/// Tracks one messaging session and relays its events.
///
/// Owns the [`SessionState`]. All mutations go through the lifecycle event
/// handler and the operations below. Background work (initialization
/// retries, reconnects) is tagged with a generation number; bumping the
/// generation makes any pending background work stand down.
pub struct Bridge {
    client: Arc<dyn MessagingClient>,
    relay: WebhookRelay,
    state: RwLock<SessionState>,
    sent: SentRegistry,
    generation: AtomicU64,
    /// Generation of the init or reconnect run driving the session, 0 when none
    init_generation: AtomicU64,
    init_retry: RetryPolicy,
    reconnect: RetryPolicy,
    capture_external: bool,
}

impl Bridge {
    pub fn new(
        client: Arc<dyn MessagingClient>,
        relay: WebhookRelay,
        config: &BridgeConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            client,
            relay,
            state: RwLock::new(SessionState::new()),
            sent: SentRegistry::default(),
            generation: AtomicU64::new(0),
            init_generation: AtomicU64::new(0),
            init_retry: config.init_retry.clone(),
            reconnect: config.reconnect.clone(),
            capture_external: config.capture_external_messages,
        })
    }

    /// Copy of the session record, without probing the client
    pub fn snapshot(&self) -> SessionState {
        self.state.read().clone()
    }

    pub fn current_status(&self) -> ConnectionStatus {
        self.state.read().status()
    }

    pub fn relay_stats(&self) -> RelayStats {
        self.relay.stats()
    }

    /// Current status, after reconciling with the client's live handle
    pub async fn status(&self) -> StatusSnapshot {
        self.reconcile().await;
        StatusSnapshot::from(&*self.state.read())
    }

    /// The pending QR payload
    pub fn qr_code(&self) -> BridgeResult<String> {
        self.state
            .read()
            .qr()
            .map(str::to_string)
            .ok_or(BridgeError::QrUnavailable)
    }

    /// Start a session unless one is starting or live. Returns immediately;
    /// initialization continues in the background.
    pub async fn connect(self: &Arc<Self>) -> ConnectionStatus {
        let status = self.current_status();
        match status {
            ConnectionStatus::Initializing | ConnectionStatus::Connected => status,
            ConnectionStatus::Disconnected | ConnectionStatus::Error => {
                self.initialize();
                ConnectionStatus::Initializing
            }
            ConnectionStatus::QrPending | ConnectionStatus::Authenticated => {
                self.reconcile().await;
                self.current_status()
            }
        }
    }

    /// Move to `initializing` and initialize the client in the background,
    /// retrying with the init policy
    pub fn initialize(self: &Arc<Self>) {
        let generation = self.next_generation();
        self.init_generation.store(generation, Ordering::SeqCst);
        self.state.write().set_status(ConnectionStatus::Initializing);
        tracing::info!(generation, "starting client initialization");

        let bridge = Arc::clone(self);
        let policy = self.init_retry.clone();
        tokio::spawn(async move { bridge.run_initialize(generation, policy, false).await });
    }

    /// Tear the session down and reset to `disconnected`
    pub async fn disconnect(&self) -> BridgeResult<()> {
        self.next_generation();
        if let Err(e) = self.client.destroy().await {
            tracing::error!(error = %e, "failed to destroy client session");
            return Err(BridgeError::TeardownFailed(e));
        }

        // A disconnect event racing the teardown may have scheduled a reconnect
        self.next_generation();
        self.state.write().reset();
        tracing::info!("session disconnected on request");
        Ok(())
    }

    /// Send a text message through the live session and relay it
    pub async fn send_message(
        &self,
        number: &str,
        body: &str,
        lead_id: Option<Value>,
    ) -> BridgeResult<SendReceipt> {
        let own_chat_id = {
            let state = self.state.read();
            if state.status() != ConnectionStatus::Connected {
                return Err(BridgeError::NotConnected);
            }
            state.account().and_then(AccountInfo::chat_id)
        };

        if number.trim().is_empty() || body.is_empty() {
            return Err(BridgeError::MissingFields);
        }
        let chat_id =
            normalize_chat_id(number).ok_or_else(|| BridgeError::InvalidNumber(number.to_string()))?;

        let options = SendOptions {
            marker: Some(self.sent.next_marker()),
        };
        let sent = self
            .client
            .send_message(&chat_id, body, options)
            .await
            .map_err(|e| {
                tracing::error!(to = %chat_id, error = %e, "send failed");
                BridgeError::SendFailed(e)
            })?;
        self.sent.remember(&sent.id);
        tracing::info!(to = %chat_id, id = %sent.id, "message sent");

        let lead_id = lead_id.filter(|v| !v.is_null() && v.as_str() != Some(""));
        let data = MessageData {
            from: own_chat_id.unwrap_or_else(|| "unknown".to_string()),
            to: Some(chat_id),
            body: body.to_string(),
            timestamp: current_timestamp(),
            kind: "chat".to_string(),
            id: sent.id.clone(),
            from_me: true,
            source: Some(MessageSource::Api),
            lead_id,
        };
        self.relay.relay(WebhookPayload::message(&data));

        Ok(SendReceipt {
            success: true,
            to: number.to_string(),
            status: "sent",
            message_id: sent.id,
            timestamp: current_timestamp(),
        })
    }

    /// Ask the client whether the session is authenticated and reconcile
    pub async fn verify_connection(&self) -> VerifyReport {
        match self.client.is_registered_user(PROBE_CHAT_ID).await {
            Ok(true) => {
                self.mark_connected();
                self.refresh_account().await;
                let state = self.state.read();
                VerifyReport {
                    status: ConnectionStatus::Connected,
                    connected: true,
                    info: state.account().cloned(),
                    timestamp: StatusSnapshot::from(&*state).timestamp,
                    error: None,
                }
            }
            Ok(false) => {
                let snapshot = StatusSnapshot::from(&*self.state.read());
                VerifyReport {
                    status: snapshot.status,
                    connected: false,
                    info: None,
                    timestamp: snapshot.timestamp,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "connection probe failed");
                VerifyReport {
                    status: ConnectionStatus::Error,
                    connected: false,
                    info: None,
                    timestamp: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn list_messages(&self) -> Value {
        json!({ "messages": {}, "total": 0, "note": NO_HISTORY_NOTE })
    }

    pub fn list_messages_for(&self, contact: &str) -> Value {
        json!({ "number": contact, "messages": [], "note": NO_HISTORY_NOTE })
    }

    pub fn clear_messages(&self) -> Value {
        json!({ "success": true, "note": NO_HISTORY_NOTE })
    }

    /// Consume lifecycle events in arrival order until the sender is dropped
    pub async fn run_events(self: Arc<Self>, mut rx: mpsc::Receiver<ClientEvent>) {
        while let Some(event) = rx.recv().await {
            self.handle_event(event).await;
        }
        tracing::info!("client event stream closed");
    }

    /// Apply one lifecycle event
    pub async fn handle_event(self: &Arc<Self>, event: ClientEvent) {
        match &event {
            ClientEvent::Message { message } => return self.relay_incoming(message),
            ClientEvent::MessageCreate { message } => return self.relay_created(message),
            ClientEvent::ChangeState { state } => {
                tracing::info!(state = %state, "client state changed");
                return;
            }
            ClientEvent::LoadingScreen { percent, .. } if !self.init_in_flight() => {
                tracing::debug!(percent, "loading screen without a pending initialization, ignored");
                return;
            }
            _ => {}
        }

        let (previous, next) = {
            let mut state = self.state.write();
            let previous = state.status();
            let Some(next) = next_status(previous, &event) else {
                tracing::debug!(event = event.name(), status = %previous, "event ignored");
                return;
            };
            match &event {
                ClientEvent::Qr { qr } => state.set_qr(qr.clone()),
                ClientEvent::AuthFailure { error } => state.fail(format!("authentication failed: {}", error)),
                _ => state.set_status(next),
            }
            (previous, next)
        };
        tracing::info!(event = event.name(), from = %previous, to = %next, "session status changed");

        match event {
            ClientEvent::Ready => {
                self.refresh_account().await;
                self.relay.relay(WebhookPayload::connected());
            }
            ClientEvent::Disconnected { reason } => {
                tracing::warn!(reason = %reason, "client disconnected");
                self.relay.relay(WebhookPayload::disconnected(&reason));
                self.schedule_reconnect();
            }
            ClientEvent::AuthFailure { error } => {
                tracing::error!(error = %error, "authentication failed");
                self.next_generation();
                self.relay.relay(WebhookPayload::auth_failure(&error));
            }
            ClientEvent::LoadingScreen { percent, message } => {
                tracing::debug!(percent, message = %message, "loading");
            }
            _ => {}
        }
    }

    fn relay_incoming(&self, message: &ClientMessage) {
        tracing::debug!(from = %message.from, id = %message.id, "message received");
        let own_chat_id = self.state.read().account().and_then(AccountInfo::chat_id);
        let data = MessageData::incoming(message, own_chat_id);
        self.relay.relay(WebhookPayload::message(&data));
    }

    fn relay_created(&self, message: &ClientMessage) {
        if !message.from_me {
            return;
        }
        if self.sent.is_api_send(message) {
            tracing::debug!(id = %message.id, "skipping echo of API send");
            return;
        }
        if !self.capture_external {
            tracing::debug!(id = %message.id, "external message capture disabled");
            return;
        }
        tracing::debug!(to = ?message.to, id = %message.id, "message sent from another device");
        self.relay.relay(WebhookPayload::message(&MessageData::external(message)));
    }

    /// Self-correct to `connected` when the live handle is ready but the
    /// local status missed it
    async fn reconcile(&self) {
        if self.client.is_ready().await && self.current_status() != ConnectionStatus::Connected {
            tracing::info!(status = %self.current_status(), "client reports ready, correcting status");
            self.mark_connected();
        }

        let needs_account = {
            let state = self.state.read();
            state.status() == ConnectionStatus::Connected && state.account().is_none()
        };
        if needs_account {
            self.refresh_account().await;
        }
    }

    fn mark_connected(&self) {
        self.state.write().set_status(ConnectionStatus::Connected);
    }

    async fn refresh_account(&self) {
        match self.client.account_info().await {
            Ok(info) => {
                tracing::info!(name = ?info.name, number = ?info.number, "account info retrieved");
                self.state.write().set_account(info);
            }
            Err(e) => tracing::warn!(error = %e, "failed to get account info"),
        }
    }

    fn schedule_reconnect(self: &Arc<Self>) {
        let generation = self.next_generation();
        self.init_generation.store(generation, Ordering::SeqCst);
        let policy = self.reconnect.clone();
        tracing::info!(delay = ?policy.delay(0), "scheduling reconnect");

        let bridge = Arc::clone(self);
        tokio::spawn(async move { bridge.run_initialize(generation, policy, true).await });
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Whether an init or reconnect run still owns the session
    fn init_in_flight(&self) -> bool {
        let generation = self.init_generation.load(Ordering::SeqCst);
        generation != 0 && self.is_current(generation)
    }

    /// Initialize with retries. With `delay_first` every attempt, including
    /// the first, waits for its policy delay.
    async fn run_initialize(self: Arc<Self>, generation: u64, policy: RetryPolicy, delay_first: bool) {
        let attempts = policy.max_attempts();
        let mut last_error = String::new();

        for attempt in 0..attempts {
            let wait = match (delay_first, attempt) {
                (true, n) => Some(policy.delay(n)),
                (false, 0) => None,
                (false, n) => Some(policy.delay(n - 1)),
            };
            if let Some(wait) = wait {
                tokio::time::sleep(wait).await;
            }
            if !self.is_current(generation) {
                tracing::debug!(generation, "initialization superseded");
                return;
            }

            {
                let mut state = self.state.write();
                match state.status() {
                    ConnectionStatus::Initializing => {}
                    status if status.can_initialize() => state.set_status(ConnectionStatus::Initializing),
                    status => {
                        tracing::debug!(status = %status, "session already progressing, retry skipped");
                        return;
                    }
                }
            }

            tracing::info!(attempt = attempt + 1, of = attempts, "initializing client");
            match self.client.initialize().await {
                Ok(()) => {
                    tracing::info!("client initialized");
                    return;
                }
                Err(e) => {
                    if !self.is_current(generation) {
                        return;
                    }
                    tracing::warn!(attempt = attempt + 1, of = attempts, error = %e, "client initialization failed");
                    last_error = e.to_string();
                    self.state.write().fail(format!("initialization failed: {}", e));
                }
            }
        }

        let failure = BridgeError::InitializationFailed {
            attempts,
            reason: last_error.clone(),
        };
        tracing::error!(error = %failure, "giving up, manual connect required");
        self.init_generation
            .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst)
            .ok();
        self.state.write().fail(failure.to_string());
        self.relay.relay(WebhookPayload::initialization_failed(attempts, &last_error));
    }
}
