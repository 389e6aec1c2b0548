//! Data types for the session bridge
//!
//! This module contains the core data structures used throughout the application.

mod error;
mod message;
mod session;
mod status;

pub use error::{
    BridgeError, BridgeResult, ClientError, ClientResult, ConfigError, DeliveryError,
};
pub use message::{ClientMessage, MessageData, MessageSource};
pub use session::{AccountInfo, SessionState};
pub use status::ConnectionStatus;
