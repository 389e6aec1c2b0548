//! Error kinds surfaced by the bridge

/// Errors from the messaging client seam
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("driver request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("driver rejected request: {0}")]
    Rejected(String),

    #[error("client not available: {0}")]
    Unavailable(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by bridge operations
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("WhatsApp client not connected")]
    NotConnected,

    #[error("QR code not available")]
    QrUnavailable,

    #[error("initialization failed after {attempts} attempts: {reason}")]
    InitializationFailed { attempts: u32, reason: String },

    #[error("Failed to disconnect: {0}")]
    TeardownFailed(#[source] ClientError),

    #[error("Failed to send message: {0}")]
    SendFailed(#[source] ClientError),

    #[error("Number and message are required")]
    MissingFields,

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors from one webhook delivery attempt
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("webhook responded with status {0}")]
    Status(u16),
}
