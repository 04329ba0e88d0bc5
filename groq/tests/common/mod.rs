//! Mock Groq API server for integration tests.
//!
//! Serves `/v1/chat/completions` and `/v1/models` with canned replies and
//! records every chat request it receives.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use bytes::Bytes;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How the mock answers a request.
pub enum Reply {
    /// A complete response.
    Fixed {
        status: u16,
        content_type: &'static str,
        body: String,
    },
    /// A `200` event stream whose body is fed through the paired sender.
    Channel(mpsc::Receiver<Bytes>),
    /// Never sends response headers.
    Hang,
}

impl Reply {
    pub fn json(status: u16, body: &Value) -> Self {
        Self::Fixed {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::Fixed {
            status,
            content_type: "text/plain",
            body: body.to_owned(),
        }
    }

    pub fn event_stream(body: impl Into<String>) -> Self {
        Self::Fixed {
            status: 200,
            content_type: "text/event-stream",
            body: body.into(),
        }
    }

    /// A streaming reply and the sender that feeds it.
    pub fn channel() -> (mpsc::Sender<Bytes>, Self) {
        let (tx, rx) = mpsc::channel(16);
        (tx, Self::Channel(rx))
    }
}

/// A chat request as seen by the server.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub body: Value,
}

struct MockState {
    chat: Mutex<Option<Reply>>,
    models: Mutex<Option<Reply>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct MockGroq {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockGroq {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            chat: Mutex::new(None),
            models: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat))
            .route("/v1/models", routing::get(handle_models))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Self {
            addr,
            shutdown,
            state,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Client pointed at this server.
    pub fn client(&self) -> groq::Client {
        groq::Client::builder()
            .api_key("test-key")
            .base_url(self.base_url())
            .build()
            .unwrap()
    }

    /// Reply to the next chat request with `reply`.
    pub fn on_chat(&self, reply: Reply) {
        *self.state.chat.lock().unwrap() = Some(reply);
    }

    /// Reply to the next models request with `reply`.
    pub fn on_models(&self, reply: Reply) {
        *self.state.models.lock().unwrap() = Some(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }
}

impl Drop for MockGroq {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    state.requests.lock().unwrap().push(Recorded {
        authorization,
        body,
    });

    let reply = state.chat.lock().unwrap().take();
    respond(reply).await
}

async fn handle_models(State(state): State<Arc<MockState>>) -> Response {
    let reply = state.models.lock().unwrap().take();
    respond(reply).await
}

async fn respond(reply: Option<Reply>) -> Response {
    match reply {
        Some(Reply::Fixed {
            status,
            content_type,
            body,
        }) => (
            StatusCode::from_u16(status).unwrap(),
            [(CONTENT_TYPE, content_type)],
            body,
        )
            .into_response(),
        Some(Reply::Channel(rx)) => {
            let body = futures::stream::unfold(rx, |mut rx| async move {
                rx.recv()
                    .await
                    .map(|bytes| (Ok::<_, std::io::Error>(bytes), rx))
            });
            (
                StatusCode::OK,
                [(CONTENT_TYPE, "text/event-stream")],
                Body::from_stream(body),
            )
                .into_response()
        }
        Some(Reply::Hang) => futures::future::pending().await,
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"message": "no reply configured"}})),
        )
            .into_response(),
    }
}

/// One `data:` event carrying a content delta.
pub fn content_event(content: &str) -> String {
    let chunk = json!({
        "id": "chatcmpl-1",
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": "llama3-8b-8192",
        "choices": [{"index": 0, "delta": {"content": content}, "finish_reason": null}],
    });
    format!("data: {chunk}\n\n")
}

/// The `data:` event that ends a stream.
pub fn done_event() -> &'static str {
    "data: [DONE]\n\n"
}
