#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::post,
};
use futures_util::StreamExt;
use serde_json::{Value, json};
use tidbit_chat_relay::{
    services::{gateway::Gateway, prompt::SYSTEM_PROMPT, rate_limiter::RateLimiter},
    state::{AppState, SharedState},
};

pub const HEL: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n";
pub const LO: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n";
pub const DONE: &str = "data: [DONE]\n";

/// Scripted stand-in for the completions gateway.
pub struct MockUpstream {
    pub status: StatusCode,
    pub chunks: Vec<&'static str>,
    /// Keep the body open after the last chunk.
    pub stall: bool,
    pub calls: AtomicUsize,
    pub bodies: Mutex<Vec<Value>>,
    pub auth: Mutex<Vec<Option<String>>>,
}

impl MockUpstream {
    pub fn streaming(chunks: Vec<&'static str>) -> Self {
        Self {
            status: StatusCode::OK,
            chunks,
            stall: false,
            calls: AtomicUsize::new(0),
            bodies: Mutex::new(Vec::new()),
            auth: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: StatusCode) -> Self {
        Self { status, ..Self::streaming(Vec::new()) }
    }

    pub fn stalling(chunks: Vec<&'static str>) -> Self {
        Self { stall: true, ..Self::streaming(chunks) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }

    pub fn expected_stream(&self) -> String {
        self.chunks.concat()
    }
}

async fn upstream_handler(
    State(mock): State<Arc<MockUpstream>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    mock.bodies.lock().unwrap().push(body);
    mock.auth.lock().unwrap().push(
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()).map(str::to_string),
    );

    if !mock.status.is_success() {
        return (
            mock.status,
            Json(json!({ "error": { "message": "upstream secret detail" } })),
        )
            .into_response();
    }

    let chunks = mock.chunks.clone();
    let stream = futures_util::stream::iter(chunks).then(|chunk| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok::<_, Infallible>(Bytes::from_static(chunk.as_bytes()))
    });

    let body = if mock.stall {
        Body::from_stream(stream.chain(futures_util::stream::pending()))
    } else {
        Body::from_stream(stream)
    };

    ([(CONTENT_TYPE, "text/event-stream")], body).into_response()
}

pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Serve `mock` and return its completions URL.
pub async fn spawn_upstream(mock: Arc<MockUpstream>) -> String {
    let router = Router::new()
        .route("/v1/chat/completions", post(upstream_handler))
        .with_state(mock);
    let addr = spawn(router).await;
    format!("http://{addr}/v1/chat/completions")
}

pub fn relay_state(upstream_url: &str, api_key: Option<&str>, limit: u32) -> AppState {
    let gateway = Gateway::new(
        upstream_url,
        "test-model",
        api_key.map(str::to_string),
        SYSTEM_PROMPT,
    )
    .unwrap();
    AppState::new(RateLimiter::new(limit, Duration::from_secs(60)), gateway)
}

pub fn shared(state: AppState) -> SharedState {
    Arc::new(state)
}

pub fn chat_body(messages: Value) -> String {
    json!({ "messages": messages }).to_string()
}
