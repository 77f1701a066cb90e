//! Stream forwarder library.
//!
//! Forwards `GET /<any path>?id=<stream>` to
//! `<upstream base>/stream-<stream>.php?<flags>` with a fixed `Referer` and
//! `User-Agent`, strips embedding protection from the answer, adds
//! permissive CORS and streams the body back.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod upstream;

pub use config::ForwarderConfig;
pub use error::ForwardError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
