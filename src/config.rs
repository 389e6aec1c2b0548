//! Bridge configuration
//!
//! Read from environment variables:
//!
//! ```bash
//! PORT=3000
//! WEBHOOK_URL=https://crm.example.com/api/whatsapp/webhook
//! WA_DATA_PATH=./wa_data
//! CAPTURE_EXTERNAL_MESSAGES=true
//! WA_DRIVER_URL=http://127.0.0.1:9230
//! RECONNECT_MAX_ATTEMPTS=10
//! LOG_FORMAT=json
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::session::RetryPolicy;
use crate::telemetry::LogFormat;
use crate::types::ConfigError;

const DEFAULT_RECONNECT_ATTEMPTS: u32 = 10;

/// Runtime configuration of the bridge
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Outbound webhook; `None` disables the relay
    pub webhook_url: Option<String>,
    /// Session-data directory handed to the automation client
    pub data_path: PathBuf,
    /// Relay messages sent from the phone or other linked devices
    pub capture_external_messages: bool,
    pub driver_url: String,
    /// Retries for `initialize()` (fixed delay)
    pub init_retry: RetryPolicy,
    /// Automatic reconnect after a dropped session (exponential).
    /// `RECONNECT_MAX_ATTEMPTS` counts every attempt, so it is stored as
    /// retries after the first one.
    pub reconnect: RetryPolicy,
    pub webhook_timeout: Duration,
    pub webhook_max_attempts: u32,
    pub webhook_queue_capacity: usize,
    pub log_format: LogFormat,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            webhook_url: None,
            data_path: PathBuf::from("./wa_data"),
            capture_external_messages: true,
            driver_url: "http://127.0.0.1:9230".to_string(),
            init_retry: RetryPolicy::fixed(3, Duration::from_secs(5)),
            reconnect: RetryPolicy::exponential(
                DEFAULT_RECONNECT_ATTEMPTS - 1,
                Duration::from_secs(5),
                Duration::from_secs(300),
            ),
            webhook_timeout: Duration::from_secs(10),
            webhook_max_attempts: 3,
            webhook_queue_capacity: 1024,
            log_format: LogFormat::Pretty,
        }
    }
}

impl BridgeConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(v) = get("HOST") {
            config.host = parse("HOST", &v)?;
        }
        if let Some(v) = get("PORT") {
            config.port = parse("PORT", &v)?;
        }
        config.webhook_url = get("WEBHOOK_URL");
        if let Some(v) = get("WA_DATA_PATH") {
            config.data_path = PathBuf::from(v);
        }
        if let Some(v) = get("CAPTURE_EXTERNAL_MESSAGES") {
            // Enabled unless explicitly "false"
            config.capture_external_messages = v.trim() != "false";
        }
        if let Some(v) = get("WA_DRIVER_URL") {
            config.driver_url = v;
        }

        if let Some(v) = get("INIT_MAX_RETRIES") {
            config.init_retry.max_retries = parse("INIT_MAX_RETRIES", &v)?;
        }
        if let Some(v) = get("INIT_RETRY_DELAY_SECS") {
            let delay = secs("INIT_RETRY_DELAY_SECS", &v)?;
            config.init_retry.base_delay = delay;
            config.init_retry.max_delay = delay;
        }
        if let Some(v) = get("RECONNECT_BASE_DELAY_SECS") {
            config.reconnect.base_delay = secs("RECONNECT_BASE_DELAY_SECS", &v)?;
        }
        if let Some(v) = get("RECONNECT_MAX_DELAY_SECS") {
            config.reconnect.max_delay = secs("RECONNECT_MAX_DELAY_SECS", &v)?;
        }
        if let Some(v) = get("RECONNECT_MAX_ATTEMPTS") {
            let attempts: u32 = parse("RECONNECT_MAX_ATTEMPTS", &v)?;
            if attempts == 0 {
                return Err(ConfigError::Invalid {
                    key: "RECONNECT_MAX_ATTEMPTS",
                    value: v,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.reconnect.max_retries = attempts - 1;
        }

        if let Some(v) = get("WEBHOOK_TIMEOUT_SECS") {
            config.webhook_timeout = secs("WEBHOOK_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("WEBHOOK_MAX_ATTEMPTS") {
            config.webhook_max_attempts = parse("WEBHOOK_MAX_ATTEMPTS", &v)?;
        }
        if let Some(v) = get("WEBHOOK_QUEUE_CAPACITY") {
            config.webhook_queue_capacity = parse("WEBHOOK_QUEUE_CAPACITY", &v)?;
        }
        if let Some(v) = get("LOG_FORMAT") {
            config.log_format = parse("LOG_FORMAT", &v)?;
        }

        if config.reconnect.max_delay < config.reconnect.base_delay {
            return Err(ConfigError::Invalid {
                key: "RECONNECT_MAX_DELAY_SECS",
                value: config.reconnect.max_delay.as_secs().to_string(),
                reason: "must not be below RECONNECT_BASE_DELAY_SECS".to_string(),
            });
        }

        Ok(config)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn secs(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    parse::<u64>(key, value).map(Duration::from_secs)
}
