//! Utility functions and helpers
//!
//! Timestamp formatting and chat address normalization.

pub mod phone;
pub mod time;

pub use phone::{normalize_chat_id, CHAT_SUFFIX};
pub use time::{current_iso8601, current_timestamp, to_iso8601};
