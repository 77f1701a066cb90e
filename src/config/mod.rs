//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) + CLI overrides
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps in new ForwardingSettings
//! ```
//!
//! Only the upstream and response sections are reloadable. Listener and
//! observability settings are fixed at startup.

pub mod cli;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use cli::CliArgs;
pub use loader::{load_config, ConfigError};
pub use schema::{
    ForwarderConfig, ForwardingSettings, ListenerConfig, ObservabilityConfig, ResponseConfig,
    TlsConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
