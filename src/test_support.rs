//! In-process stand-in for the HubSpot properties API.

use crate::config::UpstreamConfig;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub const TEST_TOKEN: &str = "pat-na1-test-token";
pub const BASE_PATH: &str = "/crm/v3/properties";

/// What the fake upstream saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

struct Canned {
    status: StatusCode,
    body: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FakeUpstream {
    pub base_url: String,
    canned: Arc<Canned>,
}

impl FakeUpstream {
    /// Answer every request with `status` and `body` (JSON, or nothing).
    pub async fn start(status: StatusCode, body: Option<serde_json::Value>) -> Self {
        Self::start_raw(status, body.map(|b| b.to_string())).await
    }

    pub async fn start_raw(status: StatusCode, body: Option<String>) -> Self {
        let canned = Arc::new(Canned {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(record).with_state(canned.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}{}", addr, BASE_PATH),
            canned,
        }
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.canned.requests.lock().await.clone()
    }

    pub fn state(&self) -> AppState {
        state_for(&self.base_url)
    }
}

pub fn state_for(base_url: &str) -> AppState {
    AppState::from_config(&UpstreamConfig {
        base_url: base_url.to_string(),
        access_token: TEST_TOKEN.to_string(),
    })
    .unwrap()
}

/// A base URL nothing is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}{}", addr, BASE_PATH)
}

/// Answers one request with `status` and headers promising a body, then
/// hangs up part way through it.
pub async fn start_truncated(status: StatusCode) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let head = format!(
            "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: 64\r\n\r\n{{\"message\":",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    format!("http://{}{}", addr, BASE_PATH)
}

async fn record(
    State(canned): State<Arc<Canned>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    canned.requests.lock().await.push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    match &canned.body {
        Some(body) => (
            canned.status,
            [(header::CONTENT_TYPE, "application/json;charset=utf-8")],
            body.clone(),
        )
            .into_response(),
        None => canned.status.into_response(),
    }
}
