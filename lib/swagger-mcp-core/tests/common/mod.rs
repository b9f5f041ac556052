#![allow(dead_code, missing_docs, clippy::expect_used, clippy::missing_panics_doc)]
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use rstest::fixture;
use serde_json::{Value, json};
use tracing::info;

use swagger_mcp_core::{Config, Dispatcher, McpServer, SwaggerTools};

pub const DOCUMENT_PATH: &str = "/openapi.json";

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// A request received by the mock API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Debug, Clone)]
struct MockState {
    document: Arc<Mutex<(StatusCode, String)>>,
    document_fetches: Arc<AtomicUsize>,
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server serving both the interface document and the described API.
#[derive(Debug)]
pub struct MockApi {
    addr: SocketAddr,
    state: MockState,
}

impl MockApi {
    pub async fn start() -> anyhow::Result<Self> {
        let state = MockState {
            document: Arc::new(Mutex::new((
                StatusCode::OK,
                json!({ "paths": {} }).to_string(),
            ))),
            document_fetches: Arc::default(),
            responses: Arc::default(),
            requests: Arc::default(),
        };

        let app = Router::new()
            .route(DOCUMENT_PATH, get(serve_document))
            .fallback(record)
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .context("binding mock api")?;
        let addr = listener.local_addr()?;
        info!(%addr, "launching mock api");
        tokio::spawn(async move {
            axum::serve(listener, app.into_make_service())
                .await
                .expect("mock api running");
        });

        Ok(Self { addr, state })
    }

    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn document_url(&self) -> String {
        format!("{}{DOCUMENT_PATH}", self.origin())
    }

    pub fn set_document(&self, document: &Value) {
        self.set_raw_document(StatusCode::OK, &document.to_string());
    }

    pub fn set_raw_document(&self, status: StatusCode, body: &str) {
        *self.state.document.lock().expect("document lock") = (status, body.to_string());
    }

    /// Answers `path` with a fixed response instead of echoing the request.
    pub fn respond(&self, path: &str, status: StatusCode, body: &str) {
        self.state
            .responses
            .lock()
            .expect("responses lock")
            .insert(path.to_string(), (status, body.to_string()));
    }

    pub fn document_fetches(&self) -> usize {
        self.state.document_fetches.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().last().cloned().expect("a recorded request")
    }

    pub fn dispatcher(&self, credential: Option<&str>) -> Dispatcher {
        let config = Config::new(&self.document_url(), credential.map(ToString::to_string))
            .expect("valid config");
        Dispatcher::new(config)
    }

    pub fn tools(&self, credential: Option<&str>) -> SwaggerTools {
        SwaggerTools::new(self.dispatcher(credential))
    }

    pub fn server(&self, credential: Option<&str>) -> McpServer {
        McpServer::new(self.tools(credential))
    }
}

async fn serve_document(State(state): State<MockState>) -> Response {
    state.document_fetches.fetch_add(1, Ordering::SeqCst);
    let (status, body) = state.document.lock().expect("document lock").clone();
    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}

// Echoes the request as JSON unless a fixed response is registered
async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let fixed = state
        .responses
        .lock()
        .expect("responses lock")
        .get(uri.path())
        .cloned();

    let echo = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "body": serde_json::from_str::<Value>(&body).unwrap_or(Value::Null),
    });

    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method,
            uri,
            headers,
            body,
        });

    match fixed {
        Some((status, body)) => (status, body).into_response(),
        None => (StatusCode::OK, axum::Json(echo)).into_response(),
    }
}

#[fixture]
pub async fn api() -> MockApi {
    init_tracing();
    match MockApi::start().await {
        Ok(api) => api,
        Err(error) => {
            panic!("fail to start mock api: {error:?}");
        }
    }
}
