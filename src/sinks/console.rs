//! Console sink - logs all surface events for testing and debugging

use crate::sinks::{OutputSink, SurfaceEvent};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// ConsoleSink logs every surface event to console/logs
///
/// This is useful for:
/// - Testing tracker behavior without a real surface target
/// - Debugging session and pattern flow
/// - Development without hardware dependencies
pub struct ConsoleSink {
    name: String,
    /// Track if sink is initialized
    initialized: Arc<RwLock<bool>>,
    /// Emission counter for debugging
    emit_count: Arc<RwLock<u64>>,
}

impl ConsoleSink {
    /// Create a new ConsoleSink with a given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            initialized: Arc::new(RwLock::new(false)),
            emit_count: Arc::new(RwLock::new(0)),
        }
    }

    fn describe(event: &SurfaceEvent) -> String {
        match event {
            SurfaceEvent::SessionOpen { side, position } => {
                format!("{} open at ({:.3}, {:.3})", side, position.x, position.y)
            },
            SurfaceEvent::SessionUpdate { points } => {
                let parts = points
                    .iter()
                    .map(|(side, p)| format!("{} ({:.3}, {:.3})", side, p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("update {}", parts)
            },
            SurfaceEvent::SessionClose { side, position } => {
                format!("{} close at ({:.3}, {:.3})", side, position.x, position.y)
            },
            SurfaceEvent::PatternOpen { side, points } => {
                format!(
                    "{} pattern open centered ({:.3}, {:.3})",
                    side, points[0].x, points[0].y
                )
            },
            SurfaceEvent::PatternMove { side, points } => {
                format!(
                    "{} pattern move centered ({:.3}, {:.3})",
                    side, points[0].x, points[0].y
                )
            },
            SurfaceEvent::PatternClose { side, points } => {
                format!(
                    "{} pattern close centered ({:.3}, {:.3})",
                    side, points[0].x, points[0].y
                )
            },
            SurfaceEvent::KeyDown { side, label } => format!("{} key '{}' down", side, label),
            SurfaceEvent::KeyUp { side, label } => format!("{} key '{}' up", side, label),
            SurfaceEvent::PointerRecenter => "pointer recenter".to_string(),
        }
    }
}

#[async_trait]
impl OutputSink for ConsoleSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init(&self) -> Result<()> {
        info!("🔌 ConsoleSink '{}' initializing", self.name);

        *self.initialized.write().await = true;
        *self.emit_count.write().await = 0;

        info!("✅ ConsoleSink '{}' initialized", self.name);
        Ok(())
    }

    async fn emit(&self, event: &SurfaceEvent) -> Result<()> {
        // Check if initialized
        if !*self.initialized.read().await {
            warn!(
                "⚠️  ConsoleSink '{}' not initialized, skipping emission",
                self.name
            );
            return Ok(());
        }

        // Increment emission counter
        let mut count = self.emit_count.write().await;
        *count += 1;
        let emit_num = *count;
        drop(count);

        let summary = Self::describe(event);

        // Update/move events arrive at poll rate and stay at debug level
        if event.is_high_rate() {
            debug!(
                "[{}] Sink '{}' → {} [emit #{}]",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                self.name,
                summary,
                emit_num
            );
        } else {
            info!(
                "🖐️  [{}] Sink '{}' → {} [emit #{}]",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                self.name,
                summary,
                emit_num
            );
        }

        debug!(
            sink = self.name,
            kind = event.kind(),
            emit_count = emit_num,
            "ConsoleSink emission"
        );

        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        let was_initialized = *self.initialized.read().await;

        if was_initialized {
            let final_count = *self.emit_count.read().await;
            info!(
                "🛑 ConsoleSink '{}' shutting down (emitted {} events)",
                self.name, final_count
            );
        }

        *self.initialized.write().await = false;
        Ok(())
    }
}
