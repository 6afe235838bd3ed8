use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::{SecondsFormat, Utc};
use lexaid_core::config::API_KEY_VAR;
use serde::de::IgnoredAny;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::AppState;

pub const CHAT_COMPLETIONS_PATH: &str = "/api/chat-completions";

const CORS_HEADERS: [(header::HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET,POST,OPTIONS"),
];

// ── Error helper ──────────────────────────────────────────────────────────

pub(crate) fn proxy_error(message: impl std::fmt::Display) -> Response {
    let message = message.to_string();
    error!("proxy error: {message}");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
}

fn with_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

fn status_of(resp: &reqwest::Response) -> StatusCode {
    StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

// ── Handlers ──────────────────────────────────────────────────────────────

pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "ok": true,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

pub(crate) async fn preflight() -> Response {
    with_cors(StatusCode::OK.into_response())
}

/// Forward one chat-completion request upstream.
///
/// The body is passed through untouched. With `"stream": true` the upstream
/// bytes are relayed as they arrive; otherwise the upstream reply bytes and
/// status are returned as received.
pub(crate) async fn chat_completions(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(api_key) = state.api_key.as_deref() else {
        warn!("chat request refused: credential not configured");
        return proxy_error(format!("Missing {API_KEY_VAR} in server environment"));
    };
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => return proxy_error(format!("request body is not JSON: {e}")),
    };
    let stream = request.get("stream").and_then(Value::as_bool).unwrap_or(false);
    info!(
        stream,
        model = request.get("model").and_then(serde_json::Value::as_str).unwrap_or("-"),
        "forwarding chat request"
    );

    let upstream = match state
        .http
        .post(&state.upstream_url)
        .bearer_auth(api_key)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => return proxy_error(e),
    };
    let status = status_of(&upstream);

    if stream {
        relay_stream(status, upstream)
    } else {
        relay_json(status, upstream).await
    }
}

async fn relay_json(status: StatusCode, upstream: reqwest::Response) -> Response {
    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return proxy_error(e),
    };
    match serde_json::from_slice::<IgnoredAny>(&bytes) {
        Ok(_) => {
            debug!(status = %status, body_len = bytes.len(), "upstream reply relayed");
            (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response()
        },
        Err(e) => proxy_error(format!("upstream reply is not JSON: {e}")),
    }
}

fn relay_stream(status: StatusCode, upstream: reqwest::Response) -> Response {
    if !status.is_success() {
        warn!(status = %status, "upstream rejected streaming request");
        return with_cors(status.into_response());
    }
    let built = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(upstream.bytes_stream()));
    match built {
        Ok(response) => with_cors(response),
        Err(e) => proxy_error(e),
    }
}
