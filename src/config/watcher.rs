//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ForwarderConfig;

/// A watcher that monitors the configuration file for changes.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by writing a temp file and renaming it over the original keep
/// triggering reloads.
pub struct ConfigWatcher {
    path: PathBuf,
    current: ForwarderConfig,
    update_tx: mpsc::UnboundedSender<ForwarderConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher seeded with the configuration already in use.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(
        path: &Path,
        current: ForwarderConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ForwarderConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                current,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self {
            path,
            current,
            update_tx,
        } = self;
        let file_name = path.file_name().map(|n| n.to_os_string());
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let last_sent = Mutex::new(current);
        let reload_path = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                let touches_config = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if !touches_config {
                    return;
                }

                match load_config(&reload_path) {
                    Ok(new_config) => {
                        let mut last = match last_sent.lock() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        // Editors emit several events per save.
                        if *last == new_config {
                            return;
                        }
                        tracing::info!(path = ?reload_path, "Config file changed, applying");
                        *last = new_config.clone();
                        let _ = update_tx.send(new_config);
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Failed to reload config. Keeping current configuration."
                        );
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
