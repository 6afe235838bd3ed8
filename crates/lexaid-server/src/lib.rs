//! HTTP gateway between lexaid clients and the upstream chat-completions API.
//!
//! The upstream credential lives only here; clients send the request body
//! without it and the gateway attaches it as a bearer token.

pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use lexaid_core::config::Config;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use routes::CHAT_COMPLETIONS_PATH;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    /// Full endpoint, e.g. `https://api.siliconflow.cn/v1/chat/completions`.
    pub upstream_url: String,
    pub api_key: Option<String>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(upstream_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("building upstream http client")?;
        Ok(Self {
            upstream_url: upstream_url.into(),
            api_key,
            http,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.upstream_url(), config.api_key.clone())
    }
}

pub fn router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route(
            CHAT_COMPLETIONS_PATH,
            axum::routing::post(routes::chat_completions).options(routes::preflight),
        )
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
