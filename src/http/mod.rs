//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → handler.rs (method/id checks, one upstream GET)
//!     → request.rs (stream id extraction, request IDs)
//!     → response.rs (header policy, streamed body)
//!     → cors.rs (permissive CORS on every forwarded response)
//!     → Send to client
//! ```

pub mod cors;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
