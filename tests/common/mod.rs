//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, StatusCode},
    response::Response,
    Router,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use stream_forwarder::config::{ForwarderConfig, ForwardingSettings};
use stream_forwarder::http::HttpServer;
use stream_forwarder::lifecycle::Shutdown;

/// What the mock upstream answers with.
#[derive(Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: &'static str,
}

impl MockReply {
    #[allow(dead_code)]
    pub fn ok(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body,
        }
    }
}

/// A request as the mock upstream saw it.
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub method: String,
    pub path_and_query: String,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    pub cookie: Option<String>,
}

#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<SeenRequest>>>);

impl Recorder {
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.0.lock().unwrap().clone()
    }

    fn record(&self, request: &Request) {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let seen = SeenRequest {
            method: request.method().to_string(),
            path_and_query: request
                .uri()
                .path_and_query()
                .map(|p| p.to_string())
                .unwrap_or_default(),
            referer: header("referer"),
            user_agent: header("user-agent"),
            cookie: header("cookie"),
        };
        self.0.lock().unwrap().push(seen);
    }
}

/// Start an upstream on an ephemeral port that records every request and
/// answers each one with `reply`.
pub async fn start_mock_upstream(reply: MockReply) -> (SocketAddr, Recorder) {
    start_routed_upstream(move |_| reply.clone()).await
}

/// Like [`start_mock_upstream`], but the reply depends on the request path.
pub async fn start_routed_upstream<F>(route: F) -> (SocketAddr, Recorder)
where
    F: Fn(&str) -> MockReply + Clone + Send + Sync + 'static,
{
    let recorder = Recorder::default();
    let seen = recorder.clone();

    let app = Router::new().fallback(move |request: Request| {
        let seen = seen.clone();
        let reply = route(request.uri().path());
        async move {
            seen.record(&request);
            let mut response = Response::new(Body::from(reply.body));
            *response.status_mut() = reply.status;
            for (name, value) in reply.headers {
                response
                    .headers_mut()
                    .append(name, HeaderValue::from_static(value));
            }
            response
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, recorder)
}

/// An upstream that promises a 100 byte body, sends a few bytes and hangs up.
#[allow(dead_code)]
pub async fn start_truncating_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nContent-Type: video/mp2t\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(b"partial").await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Defaults, pointed at a local upstream.
pub fn config_for(upstream: SocketAddr) -> ForwarderConfig {
    let mut config = ForwarderConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = format!("http://{}/stream/", upstream);
    config
}

/// A running forwarder and the handles needed to steer it.
#[allow(dead_code)]
pub struct Forwarder {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ForwarderConfig>,
    pub settings: Arc<ArcSwap<ForwardingSettings>>,
}

impl Forwarder {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

pub async fn start_forwarder(config: ForwarderConfig) -> Forwarder {
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let settings = server.settings();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    Forwarder {
        addr,
        shutdown,
        config_updates,
        settings,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
