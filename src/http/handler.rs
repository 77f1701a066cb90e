//! The forward handler.
//!
//! One linear pass per request:
//! preflight → method check → id check → target → upstream GET → response.

use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::error::{ForwardError, ForwardResult};
use crate::http::cors::preflight;
use crate::http::request::{request_id, stream_id};
use crate::http::response::forward_response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::stream_target;

pub async fn forward_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers).to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Forwarding request"
    );

    let response = match forward(&state, &method, &uri, &request_id).await {
        Ok(response) => response,
        Err(e) => {
            if e.status().is_server_error() {
                tracing::error!(request_id = %request_id, error = %e, "Forwarding failed");
                if e.is_upstream() {
                    metrics::record_upstream_error();
                }
            } else {
                tracing::debug!(request_id = %request_id, error = %e, "Rejected request");
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), response.status().as_u16(), start_time);
    response
}

async fn forward(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    request_id: &str,
) -> ForwardResult<Response> {
    if *method == Method::OPTIONS {
        return Ok(preflight());
    }
    if *method != Method::GET {
        return Err(ForwardError::MethodNotAllowed);
    }

    let id = stream_id(uri).ok_or(ForwardError::MissingStreamId)?;

    // One snapshot per request so a reload never mixes settings.
    let settings = state.settings.load_full();
    let target = stream_target(&settings.upstream, &id)?;

    tracing::debug!(request_id = %request_id, stream_id = %id, url = %target, "Fetching upstream");

    let upstream = state.client.fetch(target, &settings.upstream).await?;

    tracing::info!(
        request_id = %request_id,
        stream_id = %id,
        status = %upstream.status(),
        "Upstream responded"
    );

    forward_response(upstream, &settings.response)
}
