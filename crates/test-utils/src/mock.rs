//! Recording HTTP endpoint standing in for third-party providers.
//!
//! Binds an ephemeral port on 127.0.0.1, answers every request with a
//! configurable status/body (per path or fallback) and keeps every request
//! it saw for later assertions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use parking_lot::Mutex;
use serde_json::Value;

/// A request captured by [`MockEndpoint`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// First value of a header (case-insensitive name).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body parsed as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("request body is not JSON ({e}): {}", self.text()))
    }
}

#[derive(Debug, Clone)]
struct Reply {
    status: u16,
    body: String,
}

struct Shared {
    requests: Mutex<Vec<RecordedRequest>>,
    replies: Mutex<HashMap<String, Reply>>,
    fallback: Mutex<Reply>,
}

/// A local HTTP server that records requests.
pub struct MockEndpoint {
    addr: SocketAddr,
    shared: Arc<Shared>,
    server: tokio::task::JoinHandle<()>,
}

impl MockEndpoint {
    /// Start an endpoint answering `200 {"ok":true}` everywhere.
    pub async fn start() -> Self {
        Self::responding(200, r#"{"ok":true}"#).await
    }

    /// Start an endpoint answering `status`/`body` everywhere.
    pub async fn responding(status: u16, body: &str) -> Self {
        let shared = Arc::new(Shared {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(HashMap::new()),
            fallback: Mutex::new(Reply {
                status,
                body: body.to_string(),
            }),
        });

        let app = Router::new().fallback(record).with_state(shared.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock endpoint");
        let addr = listener.local_addr().expect("mock endpoint has no address");

        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            shared,
            server,
        }
    }

    /// Answer requests to `path` with `status`/`body`.
    pub fn reply_on(&self, path: &str, status: u16, body: &str) {
        self.shared.replies.lock().insert(
            path.to_string(),
            Reply {
                status,
                body: body.to_string(),
            },
        );
    }

    /// `http://127.0.0.1:<port>` with no trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    /// Every request seen so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().clone()
    }

    /// Requests seen for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

impl Drop for MockEndpoint {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(State(shared): State<Arc<Shared>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();

    let path = parts.uri.path().to_string();
    let headers = parts
        .headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();

    shared.requests.lock().push(RecordedRequest {
        method: parts.method.to_string(),
        path: path.clone(),
        headers,
        body: body.to_vec(),
    });

    let reply = shared
        .replies
        .lock()
        .get(&path)
        .cloned()
        .unwrap_or_else(|| shared.fallback.lock().clone());

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}
