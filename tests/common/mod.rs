//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use quote_gateway::config::GatewayConfig;
use quote_gateway::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const TOKEN: &str = "mysecrettoken";
pub const API_KEY: &str = "test-key";

/// A raw-TCP stand-in for the quote provider.
pub struct MockProvider {
    pub addr: SocketAddr,
    request_lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockProvider {
    pub fn base_url(&self) -> String {
        format!("http://{}/query", self.addr)
    }

    /// Request lines received so far, e.g. `GET /query?... HTTP/1.1`.
    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

/// Start a programmable mock provider on an ephemeral port.
pub async fn start_mock_provider<F, Fut>(f: F) -> MockProvider
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let request_lines = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let lines = request_lines.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let lines = lines.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&buf);
                if let Some(line) = head.lines().next() {
                    lines.lock().unwrap().push(line.to_string());
                }

                let (status, body) = f().await;
                let status_text = match status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    429 => "429 Too Many Requests",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockProvider {
        addr,
        request_lines,
    }
}

/// Mock provider that always answers 200 with `body`.
#[allow(dead_code)]
pub async fn start_fixed_provider(body: &'static str) -> MockProvider {
    start_mock_provider(move || async move { (200, body.to_string()) }).await
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Gateway config pointing at `base_url`, safe for local tests.
pub fn test_config(base_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.auth.bearer_token = TOKEN.into();
    config.provider.base_url = base_url.into();
    config.provider.api_key = API_KEY.into();
    config.provider.use_system_proxy = false;
    config.provider.timeout_secs = 2;
    config.provider.connect_timeout_secs = 1;
    config
}

/// A running gateway bound to an ephemeral port.
pub struct RunningGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl RunningGateway {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> quote_gateway_sdk::GatewayClient {
        self.client_with_token(TOKEN)
    }

    pub fn client_with_token(&self, token: &str) -> quote_gateway_sdk::GatewayClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        quote_gateway_sdk::GatewayClient::with_client(http, &self.url(), token)
    }
}

pub async fn start_gateway(config: GatewayConfig) -> RunningGateway {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    RunningGateway {
        addr,
        shutdown,
        handle,
    }
}
