//! Channel sink - forwards surface events to an embedding application

use crate::sinks::{OutputSink, SurfaceEvent};
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

/// ChannelSink forwards every event over an unbounded mpsc channel
///
/// Used by the test harness to assert on emitted events, and by embedders
/// that drive their own surface from the event stream.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl ChannelSink {
    /// Create the sink together with its receiving end
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SurfaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl OutputSink for ChannelSink {
    fn name(&self) -> &str {
        "channel"
    }

    async fn init(&self) -> Result<()> {
        info!("✅ ChannelSink initialized");
        Ok(())
    }

    async fn emit(&self, event: &SurfaceEvent) -> Result<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| anyhow::anyhow!("event receiver dropped"))
    }

    async fn shutdown(&self) -> Result<()> {
        info!("🛑 ChannelSink shutting down");
        Ok(())
    }
}
