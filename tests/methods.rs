//! Method and parameter checks, driven through the router without a socket.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use tower::ServiceExt;

use stream_forwarder::config::ForwarderConfig;
use stream_forwarder::http::HttpServer;

fn router() -> axum::Router {
    let mut config = ForwarderConfig::default();
    // Nothing here should ever reach the network.
    config.upstream.base_url = "http://127.0.0.1:9/stream/".into();
    HttpServer::new(config).unwrap().router()
}

async fn send(method: Method, uri: &str) -> axum::response::Response {
    router()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn every_other_method_is_405() {
    for method in [
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::HEAD,
        Method::TRACE,
        Method::from_bytes(b"PURGE").unwrap(),
    ] {
        let response = send(method.clone(), "/api/stream-proxy?id=445").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.headers()["content-type"], "text/plain");
    }
}

#[tokio::test]
async fn options_is_204_with_cors_on_any_path() {
    for uri in ["/", "/api/stream-proxy", "/a/b/c?id=1"] {
        let response = send(Method::OPTIONS, uri).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["access-control-allow-methods"], "GET, OPTIONS");
        assert_eq!(response.headers()["access-control-allow-headers"], "Content-Type");
        assert!(body_text(response).await.is_empty());
    }
}

#[tokio::test]
async fn get_without_id_is_400() {
    for uri in ["/", "/api/stream-proxy", "/api/stream-proxy?id=", "/x?stream=445"] {
        let response = send(Method::GET, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_text(response).await, "Error: Missing stream ID parameter.");
    }
}

#[tokio::test]
async fn request_id_is_generated() {
    let response = send(Method::OPTIONS, "/").await;
    let id = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
}
