//! Configuration file watcher for hot-reload support

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::AppConfig;

/// Config watcher that monitors file changes and sends reload notifications
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<AppConfig>,
}

impl ConfigWatcher {
    /// Create a new config watcher for the specified file
    pub async fn new(config_path: String) -> Result<(Self, Arc<AppConfig>)> {
        let (tx, rx) = mpsc::channel(10);

        // Load initial config
        let initial_config = AppConfig::load(&config_path)
            .await
            .context("Failed to load initial config")?;
        let initial_config = Arc::new(initial_config);

        let config_path_clone = config_path.clone();

        // Capture the Tokio runtime handle BEFORE creating the watcher
        // (notify callbacks run on their own OS thread, not in Tokio context)
        let runtime_handle = tokio::runtime::Handle::current();

        // Create file watcher
        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
                match res {
                    Ok(event) => {
                        // Only reload on modify events
                        if matches!(event.kind, EventKind::Modify(_)) {
                            debug!("Config file modified: {:?}", event.paths);

                            // Clone path for async block
                            let config_path = config_path_clone.clone();
                            let tx = tx.clone();

                            // Use the captured runtime handle to spawn async task
                            runtime_handle.spawn(async move {
                                // Debounce: wait a bit for file writes to complete
                                tokio::time::sleep(Duration::from_millis(100)).await;

                                match AppConfig::load(&config_path).await {
                                    Ok(new_config) => {
                                        info!("Configuration reloaded successfully");
                                        if let Err(e) = tx.send(new_config).await {
                                            error!("Failed to send config update: {}", e);
                                        }
                                    },
                                    Err(e) => {
                                        warn!("Failed to reload config (keeping old config): {}", e);
                                    },
                                }
                            });
                        }
                    },
                    Err(e) => {
                        error!("Watch error: {}", e);
                    },
                }
            })?;

        // Watch the config file
        watcher
            .watch(Path::new(&config_path), RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config file: {}", config_path))?;

        info!("Config file watcher started for: {}", config_path);

        Ok((
            Self {
                _watcher: watcher,
                rx,
            },
            initial_config,
        ))
    }

    /// Wait for the next config update
    /// Returns None if the watcher has been closed
    pub async fn next_config(&mut self) -> Option<AppConfig> {
        self.rx.recv().await
    }
}

/// True when the change cannot be applied live.
///
/// The gamepad provider snapshots `gamepad` and `poll_hz` at start, so
/// edits to those fields only take effect on restart. Everything else
/// (mode, bindings, keys, overlay, sinks) hot-reloads.
pub fn requires_restart(old: &AppConfig, new: &AppConfig) -> bool {
    old.gamepad != new.gamepad || old.poll_hz != new.poll_hz
}
