//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / server / config
//!     → logging.rs (tracing subscriber, structured events)
//!     → metrics.rs (counters and histograms, Prometheus scrape endpoint)
//! ```
//!
//! Every request log event carries the `x-request-id` set by the HTTP layer.

pub mod logging;
pub mod metrics;
