//! Structured logging.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is unset.
pub fn default_directive(log_level: &str) -> String {
    format!("stream_forwarder={log_level},tower_http={log_level}")
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_covers_crate_and_http_layer() {
        let directive = default_directive("debug");
        assert_eq!(directive, "stream_forwarder=debug,tower_http=debug");
        assert!(directive.parse::<EnvFilter>().is_ok());
    }
}
