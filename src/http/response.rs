//! Response handling and transformation.
//!
//! # Responsibilities
//! - Copy the upstream status code
//! - Drop hop-by-hop and embedding-protection headers
//! - Apply the content-type policy and CORS headers
//! - Stream the upstream body without buffering it

use axum::body::Body;
use axum::http::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::Response;

use crate::config::ResponseConfig;
use crate::error::{ForwardError, ForwardResult};
use crate::http::cors::apply_cors;

/// Used when upstream sends no `Content-Type` and none is forced.
pub const FALLBACK_CONTENT_TYPE: HeaderValue =
    HeaderValue::from_static("application/octet-stream");

const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "upgrade",
    "te",
    "trailer",
];

/// Turn an upstream response into the client response.
pub fn forward_response(upstream: reqwest::Response, policy: &ResponseConfig) -> ForwardResult<Response> {
    let status = upstream.status();
    let mut headers = filter_headers(upstream.headers(), policy);
    headers.insert(CONTENT_TYPE, content_type(upstream.headers(), policy)?);
    apply_cors(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

/// Copy the end-to-end upstream headers that survive the strip list.
pub fn filter_headers(upstream: &HeaderMap, policy: &ResponseConfig) -> HeaderMap {
    let mut dropped: Vec<HeaderName> = policy
        .strip_headers
        .iter()
        .filter_map(|name| HeaderName::from_bytes(name.as_bytes()).ok())
        .collect();

    // Headers named in `Connection` are hop-by-hop too.
    for value in upstream.get_all(CONNECTION) {
        if let Ok(value) = value.to_str() {
            dropped.extend(
                value
                    .split(',')
                    .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok()),
            );
        }
    }

    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        // Upstream CORS headers never leak; ours are added afterwards.
        if *name == CONTENT_LENGTH
            || HOP_BY_HOP.contains(&name.as_str())
            || name.as_str().starts_with("access-control-")
            || dropped.contains(name)
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }
    headers
}

/// Forced value if configured, otherwise upstream's, otherwise the fallback.
pub fn content_type(upstream: &HeaderMap, policy: &ResponseConfig) -> ForwardResult<HeaderValue> {
    match &policy.force_content_type {
        Some(forced) => HeaderValue::from_str(forced)
            .map_err(|e| ForwardError::InvalidTarget(format!("content type: {}", e))),
        None => Ok(upstream
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or(FALLBACK_CONTENT_TYPE)),
    }
}
