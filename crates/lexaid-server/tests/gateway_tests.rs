use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use lexaid_server::{router, AppState, CHAT_COMPLETIONS_PATH};
use serde_json::{json, Value};
use tower::ServiceExt;

const LIMIT: usize = 2 * 1024 * 1024;

#[derive(Clone)]
enum Upstream {
    Json(StatusCode, Value),
    Text(StatusCode, &'static str),
    RawJson(StatusCode, &'static str),
}

#[derive(Clone)]
struct Seen {
    reply: Upstream,
    hits: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn upstream_handler(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    seen.hits.lock().unwrap().push((auth, body));
    match seen.reply {
        Upstream::Json(status, value) => (status, Json(value)).into_response(),
        Upstream::Text(status, text) => (status, text).into_response(),
        Upstream::RawJson(status, text) => {
            (status, [(header::CONTENT_TYPE, "application/json")], text).into_response()
        },
    }
}

/// Returns the upstream url and the log of requests it received.
async fn spawn_upstream(reply: Upstream) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
    let hits = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/chat/completions", post(upstream_handler))
        .with_state(Seen {
            reply,
            hits: Arc::clone(&hits),
        });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/v1/chat/completions"), hits)
}

fn gateway(upstream_url: &str, key: Option<&str>) -> Router {
    let state = AppState::new(upstream_url, key.map(str::to_string)).unwrap();
    router(Arc::new(state), LIMIT)
}

fn chat_request(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(CHAT_COMPLETIONS_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn request_body(stream: bool) -> Value {
    json!({
        "model": "THUDM/GLM-4-9B-0414",
        "messages": [{"role": "user", "content": "你好"}],
        "temperature": 0.7,
        "stream": stream,
    })
}

#[tokio::test]
async fn health_reports_ok_and_timestamp() {
    let app = gateway("http://127.0.0.1:9/unused", None);
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], json!(true));
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "timestamp: {ts}");
}

#[tokio::test]
async fn missing_credential_never_calls_upstream() {
    let (url, hits) = spawn_upstream(Upstream::Json(StatusCode::OK, json!({}))).await;
    let response = gateway(&url, None)
        .oneshot(chat_request(request_body(false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing SILICONFLOW_API_KEY in server environment" })
    );
    assert!(hits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn non_stream_reply_is_relayed_verbatim() {
    let reply = json!({"choices": [{"message": {"content": "ok"}}]});
    let (url, hits) = spawn_upstream(Upstream::Json(StatusCode::OK, reply.clone())).await;
    let response = gateway(&url, Some("sk-test"))
        .oneshot(chat_request(request_body(false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, reply);

    let hits = hits.lock().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0.as_deref(), Some("Bearer sk-test"));
    assert_eq!(hits[0].1, request_body(false));
}

#[tokio::test]
async fn non_stream_reply_keeps_upstream_bytes_and_key_order() {
    let raw = r#"{"id":"x","object":"chat.completion","choices":[{"message":{"role":"assistant","content":"ok"}}],"created":1}"#;
    let (url, _) = spawn_upstream(Upstream::RawJson(StatusCode::OK, raw)).await;
    let response = gateway(&url, Some("sk-test"))
        .oneshot(chat_request(request_body(false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body_bytes(response).await, raw.as_bytes());
}

#[tokio::test]
async fn request_without_content_type_is_still_forwarded() {
    let (url, hits) = spawn_upstream(Upstream::RawJson(StatusCode::OK, "{}")).await;
    let request = Request::builder()
        .method(Method::POST)
        .uri(CHAT_COMPLETIONS_PATH)
        .body(Body::from(request_body(false).to_string()))
        .unwrap();
    let response = gateway(&url, Some("sk-test")).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(hits.lock().unwrap()[0].1, request_body(false));
}

#[tokio::test]
async fn malformed_request_body_is_a_json_error() {
    let (url, hits) = spawn_upstream(Upstream::RawJson(StatusCode::OK, "{}")).await;
    let request = Request::builder()
        .method(Method::POST)
        .uri(CHAT_COMPLETIONS_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = gateway(&url, Some("sk-test")).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("request body is not JSON"));
    assert!(hits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upstream_error_status_and_body_pass_through() {
    let reply = json!({"error": {"message": "rate limited"}});
    let (url, _) = spawn_upstream(Upstream::Json(StatusCode::TOO_MANY_REQUESTS, reply.clone())).await;
    let response = gateway(&url, Some("sk-test"))
        .oneshot(chat_request(request_body(false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(response).await, reply);
}

#[tokio::test]
async fn non_json_upstream_reply_is_an_error() {
    let (url, _) = spawn_upstream(Upstream::Text(StatusCode::BAD_GATEWAY, "<html>oops</html>")).await;
    let response = gateway(&url, Some("sk-test"))
        .oneshot(chat_request(request_body(false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("upstream reply is not JSON"));
}

#[tokio::test]
async fn stream_bytes_are_relayed_unchanged() {
    let events = "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n\ndata: [DONE]\n\n";
    let (url, _) = spawn_upstream(Upstream::Text(StatusCode::OK, events)).await;
    let response = gateway(&url, Some("sk-test"))
        .oneshot(chat_request(request_body(true)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::CONNECTION], "keep-alive");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(body_bytes(response).await, events.as_bytes());
}

#[tokio::test]
async fn rejected_stream_keeps_status_with_empty_body() {
    let (url, _) = spawn_upstream(Upstream::Text(StatusCode::UNAUTHORIZED, "bad key")).await;
    let response = gateway(&url, Some("sk-wrong"))
        .oneshot(chat_request(request_body(true)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_is_an_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/v1/chat/completions");
    let response = gateway(&url, Some("sk-test"))
        .oneshot(chat_request(request_body(false)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn preflight_succeeds_with_cors_headers() {
    let app = gateway("http://127.0.0.1:9/unused", None);
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri(CHAT_COMPLETIONS_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
