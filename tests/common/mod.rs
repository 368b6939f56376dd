#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use ollama_chat::{config::Config, routes::create_router, state::AppState};
use serde_json::Value;
use tokio::net::TcpListener;

pub async fn spawn(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing listens on any more.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Stand-in inference server answering `/api/generate` and `/api/ping`
/// with canned statuses and recording every generate payload.
pub struct FakeOllama {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeOllama {
    pub async fn start(generate_status: StatusCode, generate_body: &'static str, ping: StatusCode) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let app = Router::new()
            .route(
                "/api/generate",
                post(move |Json(body): Json<Value>| {
                    let recorded = recorded.clone();
                    async move {
                        recorded.lock().unwrap().push(body);
                        (generate_status, generate_body)
                    }
                }),
            )
            .route("/api/ping", get(move || async move { ping }));

        let addr = spawn(app).await;
        Self { addr, requests }
    }

    pub async fn replying(body: &'static str) -> Self {
        Self::start(StatusCode::OK, body, StatusCode::OK).await
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn config_for(ollama_url: impl Into<String>) -> Config {
    Config {
        ollama_url: ollama_url.into(),
        ..Config::default()
    }
}

pub fn app_for(ollama_url: impl Into<String>) -> Router {
    let config = config_for(ollama_url);
    let state = Arc::new(AppState::new(&config));
    create_router(&config).with_state(state)
}

/// Runs the full proxy on an ephemeral port and returns its base URL.
pub async fn spawn_proxy(ollama_url: impl Into<String>) -> String {
    let addr = spawn(app_for(ollama_url)).await;
    format!("http://{addr}")
}
