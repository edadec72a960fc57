//! chat-relay server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket relay and REST endpoints.

use tracing_subscriber::EnvFilter;

use chat_relay::app_state::AppState;
use chat_relay::config::{LogFormat, RelayConfig};
use chat_relay::domain::MessageRouter;
use chat_relay::error::RelayError;
use chat_relay::routes::build_app;
use chat_relay::service::RelayService;

#[tokio::main]
async fn main() -> Result<(), RelayError> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    let init = match config.log_format {
        LogFormat::Json => subscriber.json().try_init(),
        LogFormat::Text => subscriber.try_init(),
    };
    init.map_err(|err| RelayError::Internal(format!("tracing init failed: {err}")))?;

    tracing::info!(addr = %config.listen_addr, "starting chat-relay");

    let router = MessageRouter::new(config.fallback_username.clone());
    let relay = RelayService::new(router, config.outbound_queue_capacity);
    let app = build_app(AppState::new(relay));

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        addr = %config.listen_addr,
        fallback = %config.fallback_username,
        queue_capacity = config.outbound_queue_capacity,
        "server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
