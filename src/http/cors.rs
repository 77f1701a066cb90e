//! Permissive CORS headers.
//!
//! Any origin may consume a forwarded stream. The header set is fixed, so it
//! is written directly instead of going through a policy layer.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

pub const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
pub const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, OPTIONS");
pub const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");

/// Set the headers every forwarded response carries, replacing upstream's.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
}

/// Answer a preflight: 204, empty body.
pub fn preflight() -> Response {
    let mut headers = HeaderMap::new();
    apply_cors(&mut headers);
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
    (StatusCode::NO_CONTENT, headers).into_response()
}
