use std::sync::Arc;

use lexaid_core::config::{Config, API_KEY_VAR};
use lexaid_server::{router, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "lexaid_server=info,tower_http=debug";

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // LOG_FORMAT=json for line-delimited logs behind a collector.
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    if !config.has_credential() {
        warn!("{API_KEY_VAR} is not set; chat requests will fail until it is configured");
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = router(state, config.body_limit_bytes);

    let addr = format!("{}:{}", config.web_bind, config.web_port);
    info!(upstream = %config.upstream_url(), "Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
