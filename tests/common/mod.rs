#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use deal_proxy::config::Config;
use deal_proxy::routes::create_router;
use deal_proxy::state::AppState;
use figment::{
    providers::{Format, Yaml},
    Figment,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub const API_TOKEN: &str = "mock_token";

pub fn build_config(api_url: &str) -> Config {
    let yaml = format!(
        r#"
api_url: "{api_url}"
api_token: "{API_TOKEN}"
bind_address: 127.0.0.1:0
logging:
  level: "warn"
  format: "json"
"#
    );

    Config::from_figment(Figment::new().merge(Yaml::string(&yaml)))
        .expect("Failed to parse test config YAML")
}

/// Router plus a handle on its state, so tests can read the accumulator directly.
pub fn build_app(api_url: &str) -> (Router, AppState) {
    let state = AppState::new(Arc::new(build_config(api_url))).expect("state should build");
    (create_router(state.clone()), state)
}

pub fn request(method: Method, path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn empty_request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

pub async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

/// An address where nothing listens.
pub fn unreachable_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr
}

/// An upstream that accepts connections and closes them before answering.
pub async fn spawn_dropping_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => drop(socket),
                Err(_) => break,
            }
        }
    });
    addr
}

/// An upstream that promises a 100 byte body, sends a few bytes, then closes.
pub async fn spawn_truncating_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let _ = socket
                    .write_all(
                        b"HTTP/1.1 200 OK\r\n\
                          Content-Type: application/json\r\n\
                          Content-Length: 100\r\n\r\n\
                          {\"success\":",
                    )
                    .await;
                let _ = socket.shutdown().await;
                // Drain until the client hangs up so the close is a FIN, not a reset.
                while let Ok(n) = socket.read(&mut buf).await {
                    if n == 0 {
                        break;
                    }
                }
            });
        }
    });
    addr
}
