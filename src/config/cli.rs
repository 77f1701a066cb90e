//! Command-line arguments and their overlay onto the config file.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::ForwarderConfig;
use crate::config::validation::validate_config;

/// Forwards stream document requests to a fixed upstream host with
/// hotlink-friendly headers and permissive CORS.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "stream-forwarder", version, about, long_about = None)]
pub struct CliArgs {
    /// TOML config file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "FORWARDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Reload upstream and response settings when the config file changes.
    #[arg(long, requires = "config")]
    pub watch: bool,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(long, env = "FORWARDER_BIND")]
    pub bind: Option<String>,

    /// Upstream stream directory, e.g. https://dlhd.dad/stream/.
    #[arg(long, env = "FORWARDER_BASE_URL")]
    pub base_url: Option<String>,

    /// Referer sent upstream. Defaults to the base URL.
    #[arg(long, env = "FORWARDER_REFERER")]
    pub referer: Option<String>,

    /// Always answer with this Content-Type (e.g. text/html).
    #[arg(long, env = "FORWARDER_FORCE_CONTENT_TYPE")]
    pub force_content_type: Option<String>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, env = "FORWARDER_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// The config file as written, or defaults when no file was given.
    pub fn load_base(&self) -> Result<ForwarderConfig, ConfigError> {
        match &self.config {
            Some(path) => load_config(path),
            None => Ok(ForwarderConfig::default()),
        }
    }

    /// Apply command-line overrides to `base` and validate the result.
    pub fn overlay(&self, mut base: ForwarderConfig) -> Result<ForwarderConfig, ConfigError> {
        if let Some(bind) = &self.bind {
            base.listener.bind_address = bind.clone();
        }
        if let Some(base_url) = &self.base_url {
            base.upstream.base_url = base_url.clone();
        }
        if let Some(referer) = &self.referer {
            base.upstream.referer = Some(referer.clone());
        }
        if let Some(content_type) = &self.force_content_type {
            base.response.force_content_type = Some(content_type.clone());
        }
        if let Some(level) = &self.log_level {
            base.observability.log_level = level.clone();
        }

        validate_config(&base).map_err(ConfigError::Validation)?;
        Ok(base)
    }
}
