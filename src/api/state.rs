//! Shared application state for HTTP handlers

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::client::ClientEvent;
use crate::session::Bridge;

/// State injected into every handler
pub struct AppState {
    /// The session bridge
    pub bridge: Arc<Bridge>,

    /// Feeds the bridge's event loop with events pushed by the driver
    pub events: mpsc::Sender<ClientEvent>,
}

impl AppState {
    pub fn new(bridge: Arc<Bridge>, events: mpsc::Sender<ClientEvent>) -> Self {
        Self { bridge, events }
    }
}
