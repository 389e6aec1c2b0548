//! Session Bridge - Binary Entry Point
//!
//! Wires the driver client, webhook relay and bridge together and serves
//! the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use session_bridge::api::{create_router, AppState};
use session_bridge::client::{DriverClient, MessagingClient};
use session_bridge::config::BridgeConfig;
use session_bridge::session::Bridge;
use session_bridge::telemetry::init_logging;
use session_bridge::webhook::build_relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BridgeConfig::from_env().context("invalid configuration")?;
    init_logging(config.log_format);
    tracing::info!(version = session_bridge::VERSION, "starting session bridge");

    let client: Arc<dyn MessagingClient> = Arc::new(
        DriverClient::new(&config.driver_url, &config.data_path)
            .context("failed to build driver client")?,
    );
    let relay = build_relay(&config, client.clone()).context("failed to build webhook relay")?;
    let bridge = Bridge::new(client, relay, &config);

    let (event_tx, event_rx) = mpsc::channel(256);
    tokio::spawn(bridge.clone().run_events(event_rx));

    bridge.initialize();

    let app = create_router(Arc::new(AppState::new(bridge, event_tx)));
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "session bridge API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("session bridge stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
