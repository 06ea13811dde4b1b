pub mod api; // HTTP surface: /message, /appointments, /health
pub mod appointment; // Appointment extraction + log
pub mod config;
pub mod conversation; // Keyword rules + per-user context
pub mod core_state; // Shared state behind every transport

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Serve the API until Ctrl-C, then shut down gracefully.
pub async fn run(config: ServerConfig) -> Result<(), api::ServerError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let core = Arc::new(core_state::CoreState::new());
    let mut server = api::server::start_server_on(core, config.socket_addr()).await?;
    tracing::info!(
        addr = %server.info.addr,
        instance_id = %server.info.instance_id,
        "Listening"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C, shutting down: {e}");
    }

    server.shutdown();
    server.join().await;
    Ok(())
}
