//! In-process stand-in for a Gilgamesh deployment. It answers `/health` and
//! `/messages` with the same envelope the real service uses and lets tests
//! break individual behaviours.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use gilgamesh_probe::{Environment, HarnessConfig};
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// Reply to reads with `messages` as an object instead of an array.
    MalformedRead,
    /// Store every write twice.
    DoubleWrite,
    /// Answer writes with 500.
    RejectWrites,
    /// Report a different `message_id` than the one stored.
    WrongId,
    /// Reply to reads without the `value` envelope, as paging deployments do.
    BarePage,
}

#[derive(Default)]
struct Inner {
    messages: HashMap<String, Vec<String>>,
    authorization: Vec<String>,
    read_queries: Vec<HashMap<String, String>>,
}

#[derive(Clone)]
pub struct StandIn {
    health_status: StatusCode,
    fault: Fault,
    inner: Arc<Mutex<Inner>>,
}

impl StandIn {
    pub fn healthy() -> Self {
        Self {
            health_status: StatusCode::OK,
            fault: Fault::None,
            inner: Arc::default(),
        }
    }

    pub fn with_health(mut self, status: StatusCode) -> Self {
        self.health_status = status;
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = fault;
        self
    }

    /// Bind a free local port and serve until the test runtime shuts down.
    pub async fn spawn(self) -> Server {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind free port");
        let addr = listener.local_addr().expect("local_addr");

        let app = Router::new()
            .route("/health", get(health))
            .route("/messages", get(read_messages).post(write_message))
            .with_state(self.clone());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Server {
            addr,
            state: self,
        }
    }
}

pub struct Server {
    pub addr: SocketAddr,
    state: StandIn,
}

impl Server {
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("valid local url")
    }

    /// Config whose `local` entry points at this server.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::default().with_base_url(Environment::Local, self.base_url())
    }

    pub fn stored(&self, topic: &str) -> Vec<String> {
        let inner = self.state.inner.lock().unwrap();
        inner.messages.get(topic).cloned().unwrap_or_default()
    }

    pub fn authorization_headers(&self) -> Vec<String> {
        self.state.inner.lock().unwrap().authorization.clone()
    }

    pub fn read_queries(&self) -> Vec<HashMap<String, String>> {
        self.state.inner.lock().unwrap().read_queries.clone()
    }
}

/// Address nothing listens on.
pub async fn closed_port_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    drop(listener);
    Url::parse(&format!("http://{addr}")).expect("valid local url")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteBody {
    topic: String,
    message_id: String,
}

async fn health(State(state): State<StandIn>) -> StatusCode {
    state.health_status
}

async fn write_message(
    State(state): State<StandIn>,
    headers: HeaderMap,
    Json(body): Json<WriteBody>,
) -> (StatusCode, Json<Value>) {
    let mut inner = state.inner.lock().unwrap();
    record_auth(&mut inner, &headers);

    if state.fault == Fault::RejectWrites {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "FAILURE" })),
        );
    }

    let copies = if state.fault == Fault::DoubleWrite { 2 } else { 1 };
    let stored = inner.messages.entry(body.topic).or_default();
    for _ in 0..copies {
        stored.push(body.message_id.clone());
    }

    (StatusCode::OK, Json(json!({ "status": "SUCCESS" })))
}

async fn read_messages(
    State(state): State<StandIn>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut inner = state.inner.lock().unwrap();
    record_auth(&mut inner, &headers);
    inner.read_queries.push(params.clone());

    let Some(topic) = params.get("topic") else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "FAILURE" })),
        );
    };

    if state.fault == Fault::MalformedRead {
        return (
            StatusCode::OK,
            Json(json!({ "status": "SUCCESS", "value": { "messages": {} } })),
        );
    }

    let messages: Vec<Value> = inner
        .messages
        .get(topic)
        .map(|ids| {
            ids.iter()
                .map(|id| {
                    let id = if state.fault == Fault::WrongId {
                        format!("{id}-other")
                    } else {
                        id.clone()
                    };
                    json!({ "ts": 1_690_000_000_000u64, "topic": topic, "message_id": id })
                })
                .collect()
        })
        .unwrap_or_default();

    let body = if state.fault == Fault::BarePage {
        json!({ "topic": topic, "direction": "forward", "nextId": null, "messages": messages })
    } else {
        json!({ "status": "SUCCESS", "value": { "messages": messages } })
    };

    (StatusCode::OK, Json(body))
}

fn record_auth(inner: &mut Inner, headers: &HeaderMap) {
    if let Some(value) = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        inner.authorization.push(value.to_string());
    }
}
