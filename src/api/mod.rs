//! HTTP API for the session bridge
//!
//! JSON endpoints for status polling, session control and message sending,
//! plus the ingress for lifecycle events pushed by the automation driver.

pub mod http;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
