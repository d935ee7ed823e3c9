//! Test doubles shared by the unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::{json, Value};

use crate::config::Config;
use crate::conversation::Conversation;
use crate::providers::{Upstream, UpstreamError};

pub const TEST_KEY: &str = "test-secret-key-1234";

/// Config pointing at `api_base` with a fake credential
pub fn test_config(api_base: Option<&str>) -> Config {
    let api_base = api_base.map(str::to_string);
    Config::from_lookup(move |name| match name {
        "MODEL_API_KEY" => Some(TEST_KEY.to_string()),
        "MODEL_ID" => Some("gemini-test".to_string()),
        "UPSTREAM_TIMEOUT_SECS" => Some("5".to_string()),
        "MODEL_API_BASE" => api_base.clone(),
        _ => None,
    })
    .unwrap()
}

/// Upstream body carrying a single candidate with `text`
pub fn candidate(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] }, "finishReason": "STOP" }
        ]
    })
}

/// A request received by [`MockServer`]
#[derive(Debug, Clone)]
pub struct Captured {
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Fake upstream HTTP server on an ephemeral port
pub struct MockServer {
    pub base: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockServer {
    /// Answer every request with `status` and a JSON `body`
    pub async fn json(status: StatusCode, body: Value) -> Self {
        Self::start(move || (status, axum::Json(body.clone())).into_response()).await
    }

    /// Answer every request with `status` and a raw text body
    pub async fn raw(status: StatusCode, body: &'static str) -> Self {
        Self::start(move || (status, body).into_response()).await
    }

    async fn start<F>(respond: F) -> Self
    where
        F: Fn() -> axum::response::Response + Clone + Send + Sync + 'static,
    {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: Bytes| {
            let sink = sink.clone();
            let respond = respond.clone();
            async move {
                let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
                sink.lock().unwrap().push(Captured {
                    uri: uri.to_string(),
                    headers,
                    body,
                });
                respond()
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{}", addr),
            captured,
        }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// In-process upstream returning a fixed outcome
pub struct ScriptedUpstream {
    outcome: Result<Option<String>, UpstreamError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl ScriptedUpstream {
    pub fn replying(text: &str) -> Self {
        Self::with(Ok(Some(text.to_string())))
    }

    pub fn with(outcome: Result<Option<String>, UpstreamError>) -> Self {
        Self {
            outcome,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _conversation: &Conversation) -> Result<Option<String>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}
