//! Errors produced while forwarding a single request.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Error: Missing stream ID parameter.")]
    MissingStreamId,

    #[error("invalid upstream target: {0}")]
    InvalidTarget(String),

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl ForwardError {
    pub fn status(&self) -> StatusCode {
        match self {
            ForwardError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ForwardError::MissingStreamId => StatusCode::BAD_REQUEST,
            ForwardError::InvalidTarget(_) | ForwardError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// True only when the upstream exchange itself failed.
    pub fn is_upstream(&self) -> bool {
        matches!(self, ForwardError::Upstream(_))
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Only failures get the prefix; the message itself is not sanitised.
        let body = if status.is_server_error() {
            format!("Proxy Failed: {}", self)
        } else {
            self.to_string()
        };
        (status, [(header::CONTENT_TYPE, "text/plain")], body).into_response()
    }
}

pub type ForwardResult<T> = Result<T, ForwardError>;
