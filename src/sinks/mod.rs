//! Output sinks consuming surface events
//!
//! The router translates tracker sessions into [`SurfaceEvent`]s and fans
//! them out to every registered sink. Sinks are the integration seam: a
//! console logger ships by default, and embedders receive events over a
//! channel sink.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::engine::palm::PALM_POINT_COUNT;
use crate::engine::{Side, StickVector};

pub mod channel;
pub mod console;

pub use channel::ChannelSink;
pub use console::ConsoleSink;

/// Event vocabulary shared by all sinks
///
/// Positions are in stick space (`[-1, 1]` per axis, +y up). `SessionUpdate`
/// carries one point per side with an open session so a cycle where both
/// sides moved lands in a single batched event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SurfaceEvent {
    SessionOpen {
        side: Side,
        position: StickVector,
    },
    SessionUpdate {
        points: Vec<(Side, StickVector)>,
    },
    SessionClose {
        side: Side,
        position: StickVector,
    },
    PatternOpen {
        side: Side,
        points: [StickVector; PALM_POINT_COUNT],
    },
    PatternMove {
        side: Side,
        points: [StickVector; PALM_POINT_COUNT],
    },
    PatternClose {
        side: Side,
        points: [StickVector; PALM_POINT_COUNT],
    },
    KeyDown {
        side: Side,
        label: String,
    },
    KeyUp {
        side: Side,
        label: String,
    },
    PointerRecenter,
}

impl SurfaceEvent {
    /// Short label used in logs and counters
    pub fn kind(&self) -> &'static str {
        match self {
            SurfaceEvent::SessionOpen { .. } => "session_open",
            SurfaceEvent::SessionUpdate { .. } => "session_update",
            SurfaceEvent::SessionClose { .. } => "session_close",
            SurfaceEvent::PatternOpen { .. } => "pattern_open",
            SurfaceEvent::PatternMove { .. } => "pattern_move",
            SurfaceEvent::PatternClose { .. } => "pattern_close",
            SurfaceEvent::KeyDown { .. } => "key_down",
            SurfaceEvent::KeyUp { .. } => "key_up",
            SurfaceEvent::PointerRecenter => "pointer_recenter",
        }
    }

    /// True for events emitted at poll rate rather than on transitions
    pub fn is_high_rate(&self) -> bool {
        matches!(
            self,
            SurfaceEvent::SessionUpdate { .. } | SurfaceEvent::PatternMove { .. }
        )
    }
}

/// Output sink trait - all surface integrations implement this
///
/// Note: All methods take &self (not &mut self) to support Arc<dyn OutputSink>.
/// Sinks should use interior mutability (RwLock, Mutex, etc.) for mutable state.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Get the sink name (e.g., "console", "channel")
    fn name(&self) -> &str;

    /// Initialize the sink
    async fn init(&self) -> Result<()>;

    /// Deliver one event
    async fn emit(&self, event: &SurfaceEvent) -> Result<()>;

    /// Shutdown the sink gracefully
    async fn shutdown(&self) -> Result<()>;
}

/// Fan an event out to every sink. A failing sink logs a warning and does
/// not stop delivery to the others.
pub async fn emit_all(sinks: &[Arc<dyn OutputSink>], event: &SurfaceEvent) {
    for sink in sinks {
        if let Err(e) = sink.emit(event).await {
            warn!("⚠️  Sink '{}' failed on {}: {}", sink.name(), event.kind(), e);
        }
    }
}
