//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! stream id
//!     → target.rs (substitute id into the URL template)
//!     → client.rs (single GET with fixed Referer / User-Agent)
//!     → reqwest::Response handed back with its body unread
//! ```

pub mod client;
pub mod target;

pub use client::UpstreamClient;
pub use target::stream_target;
