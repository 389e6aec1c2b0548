//! Session Bridge
//!
//! Tracks the connection state of one WhatsApp session held by an external
//! automation client, relays its events to a CRM webhook and exposes a
//! small JSON HTTP API for status polling and message sending.
//!
//! # Modules
//!
//! - `types`: Session state, message and error types
//! - `client`: The `MessagingClient` seam and its implementations
//! - `session`: The `Bridge`, status transitions and retry policies
//! - `webhook`: Webhook payloads, sinks and the delivery outbox
//! - `api`: Axum router and handlers
//! - `config`: Environment configuration
//! - `telemetry`: Logging setup
//! - `utils`: Timestamps and chat address normalization
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use session_bridge::{Bridge, BridgeConfig, ClientEvent, ScriptedClient, WebhookRelay};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = BridgeConfig::default();
//!     let bridge = Bridge::new(Arc::new(ScriptedClient::new()), WebhookRelay::disabled(), &config);
//!
//!     bridge.connect().await;
//!     bridge.handle_event(ClientEvent::Qr { qr: "2@abc".to_string() }).await;
//!     assert_eq!(bridge.qr_code().unwrap(), "2@abc");
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod session;
pub mod telemetry;
pub mod types;
pub mod utils;
pub mod webhook;

// Re-export commonly used items at crate root
pub use client::{ClientEvent, DriverClient, MessagingClient, ScriptedClient};
pub use config::BridgeConfig;
pub use session::{Bridge, RetryPolicy, StatusSnapshot};
pub use types::{AccountInfo, BridgeError, BridgeResult, ConnectionStatus, SessionState};
pub use webhook::{WebhookPayload, WebhookRelay};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
