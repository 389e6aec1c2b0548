//! Session management
//!
//! - `bridge`: the [`Bridge`] owning the session record
//! - `machine`: pure status transitions
//! - `retry`: init and reconnect retry policies
//! - `dedup`: recognizing echoes of API sends
//! - `report`: response shapes of bridge operations

pub mod bridge;
pub mod dedup;
pub mod machine;
pub mod report;
pub mod retry;

pub use bridge::Bridge;
pub use dedup::SentRegistry;
pub use machine::{next_status, replay};
pub use report::{SendReceipt, StatusSnapshot, VerifyReport};
pub use retry::RetryPolicy;
