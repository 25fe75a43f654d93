//! Router module - Core orchestration of input frames and surface output
//!
//! The Router is the central orchestrator that manages:
//! - Both per-side direction trackers and their session state
//! - Mode dispatch (touch / mouse / keys) per input frame
//! - Sink registration and event fan-out
//! - Overlay frame publishing after every cycle
//! - Configuration hot-reload

mod keys;
mod mouse;
mod touch;

#[cfg(test)]
mod tests;

use crate::config::{AppConfig, ResolvedBinding, TrackerMode};
use crate::engine::palm::palm_points;
use crate::engine::{
    project, DirectionTracker, SessionSignal, Side, SideInputs, StickVector, TrackerEvent,
};
use crate::input::gamepad::InputFrame;
use crate::sinks::{emit_all, OutputSink, SurfaceEvent};
use crate::viz::{OverlayFrame, OverlayHandle, OverlaySide};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Config fields consulted every cycle, resolved once per reload
#[derive(Debug, Clone)]
pub(crate) struct CycleSettings {
    pub mode: TrackerMode,
    pub left: ResolvedBinding,
    pub right: ResolvedBinding,
    pub palm_radius: f32,
    pub fade_radius: f32,
    pub overlay_enabled: bool,
    pub labels: Vec<String>,
}

impl CycleSettings {
    pub(crate) fn resolve(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            mode: config.mode,
            left: config.bindings.left.resolve()?,
            right: config.bindings.right.resolve()?,
            palm_radius: config.palm_radius,
            fade_radius: config.overlay.fade_radius,
            overlay_enabled: config.overlay.enabled,
            labels: config.keys.labels.clone(),
        })
    }
}

/// Mode-specific state for one side
#[derive(Debug, Default)]
pub(crate) struct SideFlow {
    /// Center of the palm pattern currently down (touch mode)
    pub palm_center: Option<StickVector>,
    /// Palm button state last cycle, for edge detection
    pub prev_palm: bool,
    /// Label currently held down (keys mode)
    pub held_key: Option<String>,
}

/// Mode-specific state shared across cycles
#[derive(Debug, Default)]
pub(crate) struct FlowState {
    pub left: SideFlow,
    pub right: SideFlow,
    /// Which side feeds the cursor when both are active (mouse mode)
    pub mouse_flip: bool,
}

impl FlowState {
    pub(crate) fn side(&self, side: Side) -> &SideFlow {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn side_mut(&mut self, side: Side) -> &mut SideFlow {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Main router orchestrating mode flows, sink fan-out, and overlay publishing
pub struct Router {
    /// Application configuration (shared with the config watcher)
    pub(crate) config: Arc<RwLock<AppConfig>>,
    /// Registered sinks in registration order
    pub(crate) sinks: Arc<RwLock<Vec<Arc<dyn OutputSink>>>>,
    /// Per-side session state machines
    pub(crate) left: DirectionTracker,
    pub(crate) right: DirectionTracker,
    /// Resolved per-cycle settings, refreshed on config updates
    pub(crate) settings: CycleSettings,
    /// Mode-specific flow state
    pub(crate) flow: FlowState,
    /// Overlay publisher
    pub(crate) overlay: OverlayHandle,
    /// Scratch buffer the trackers append diagnostics to
    pub(crate) tracker_events: Vec<TrackerEvent>,
}

impl Router {
    /// Create a new Router with initial configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        let settings = CycleSettings::resolve(&config)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            sinks: Arc::new(RwLock::new(Vec::new())),
            left: DirectionTracker::new(Side::Left),
            right: DirectionTracker::new(Side::Right),
            settings,
            flow: FlowState::default(),
            overlay: OverlayHandle::new(),
            tracker_events: Vec::new(),
        })
    }

    /// Handle consumers read overlay frames from
    pub fn overlay_handle(&self) -> OverlayHandle {
        self.overlay.clone()
    }

    /// Shared configuration handle
    pub fn config_handle(&self) -> Arc<RwLock<AppConfig>> {
        self.config.clone()
    }

    /// Register and initialize a sink
    pub async fn register_sink(&self, sink: Arc<dyn OutputSink>) -> Result<()> {
        debug!("Registering sink '{}'...", sink.name());

        // Initialize the sink
        if let Err(e) = sink.init().await {
            warn!("Failed to initialize sink '{}': {}", sink.name(), e);
            return Err(e);
        }

        // Store the sink
        let mut sinks = self.sinks.write().await;
        sinks.push(sink.clone());

        debug!("Sink '{}' registered and initialized", sink.name());
        Ok(())
    }

    /// List all registered sink names
    pub async fn list_sinks(&self) -> Vec<String> {
        let sinks = self.sinks.read().await;
        sinks.iter().map(|s| s.name().to_string()).collect()
    }

    /// Advance one poll cycle: run the active mode flow, fan events out to
    /// the sinks, and publish the overlay frame.
    pub async fn process_frame(&mut self, frame: &InputFrame) {
        let events = match self.settings.mode {
            TrackerMode::Touch => self.process_touch(frame),
            TrackerMode::Mouse => self.process_mouse(frame),
            TrackerMode::Keys => self.process_keys(frame),
        };

        self.log_tracker_events();
        self.emit(&events).await;

        if self.settings.overlay_enabled {
            self.publish_overlay(frame).await;
        }
    }

    /// Update configuration (hot-reload support)
    ///
    /// A mode change closes whatever the old flow had open before the new
    /// settings take effect.
    pub async fn update_config(&mut self, new_config: AppConfig) -> Result<()> {
        info!("🔄 Updating configuration (hot-reload)...");

        let new_settings = CycleSettings::resolve(&new_config)?;

        if new_settings.mode != self.settings.mode {
            info!(
                "Mode change: {} → {}",
                self.settings.mode.as_str(),
                new_settings.mode.as_str()
            );
            let events = self.close_open_flows();
            self.log_tracker_events();
            self.emit(&events).await;
        }

        *self.config.write().await = new_config;
        self.settings = new_settings;

        info!("✅ Configuration updated");
        Ok(())
    }

    /// Close open sessions, patterns, and keys, then shut the sinks down.
    pub async fn shutdown(&mut self) {
        let events = self.close_open_flows();
        self.log_tracker_events();
        self.emit(&events).await;

        let sinks = self.sinks.read().await.clone();
        for sink in sinks {
            if let Err(e) = sink.shutdown().await {
                warn!("Sink '{}' shutdown failed: {}", sink.name(), e);
            }
        }
    }

    /// Fan events out to every registered sink, in order.
    pub(crate) async fn emit(&self, events: &[SurfaceEvent]) {
        if events.is_empty() {
            return;
        }
        let sinks = self.sinks.read().await.clone();
        for event in events {
            emit_all(&sinks, event).await;
        }
    }

    /// Close whatever the current mode has open. Used on mode switches and
    /// shutdown so the surface never keeps a stale contact or key.
    pub(crate) fn close_open_flows(&mut self) -> Vec<SurfaceEvent> {
        let mut out = Vec::new();
        let mouse_mode = self.settings.mode == TrackerMode::Mouse;
        let keys_mode = self.settings.mode == TrackerMode::Keys;
        let mut any_session_closed = false;

        for side in [Side::Left, Side::Right] {
            // Keys mode: lift the held key
            if let Some(label) = self.flow.side_mut(side).held_key.take() {
                out.push(SurfaceEvent::KeyUp { side, label });
            }

            // Touch mode: close the palm pattern at its last center
            let flow = self.flow.side_mut(side);
            flow.prev_palm = false;
            if let Some(center) = flow.palm_center.take() {
                out.push(SurfaceEvent::PatternClose {
                    side,
                    points: palm_points(center, self.settings.palm_radius),
                });
            }

            // Open sessions close at center
            let signal = match side {
                Side::Left => self.left.reset(&mut self.tracker_events),
                Side::Right => self.right.reset(&mut self.tracker_events),
            };
            if let Some(SessionSignal::Close(position)) = signal {
                any_session_closed = true;
                if !keys_mode {
                    out.push(SurfaceEvent::SessionClose { side, position });
                }
            }
        }

        if mouse_mode && any_session_closed {
            out.push(SurfaceEvent::PointerRecenter);
        }

        self.flow.mouse_flip = false;
        out
    }

    pub(crate) fn tracker(&self, side: Side) -> &DirectionTracker {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn tracker_mut(&mut self, side: Side) -> &mut DirectionTracker {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Inputs for one side under the current bindings
    pub(crate) fn side_inputs(&self, frame: &InputFrame, side: Side) -> SideInputs {
        let binding = match side {
            Side::Left => &self.settings.left,
            Side::Right => &self.settings.right,
        };
        SideInputs {
            stick: frame.stick(side),
            primary: frame.buttons.get(binding.primary),
            lock: frame.buttons.get(binding.lock),
        }
    }

    /// Drain tracker diagnostics into the log
    pub(crate) fn log_tracker_events(&mut self) {
        for event in self.tracker_events.drain(..) {
            match event {
                TrackerEvent::DirectionCaptured { side, sector } => {
                    debug!("{} captured direction {:?}", side, sector.map(|s| s.index()));
                },
                TrackerEvent::LockEngaged {
                    side,
                    held,
                    endpoint,
                } => {
                    debug!(
                        "{} locked onto rail {} → {}",
                        side,
                        held.index(),
                        endpoint.index()
                    );
                },
                TrackerEvent::LockReleased { side } => {
                    debug!("{} lock released", side);
                },
            }
        }
    }

    /// Publish the overlay frame for this cycle
    pub(crate) async fn publish_overlay(&self, frame: &InputFrame) {
        let overlay_frame = OverlayFrame {
            seq: frame.seq,
            left: self.overlay_side(frame, Side::Left),
            right: self.overlay_side(frame, Side::Right),
        };
        self.overlay.publish(overlay_frame).await;
    }

    fn overlay_side(&self, frame: &InputFrame, side: Side) -> OverlaySide {
        let state = self.tracker(side).state();
        let stick = frame.stick(side);

        // Pointer rides the rail while locked
        let pointer = match (state.locked, state.held_direction, state.locked_endpoint) {
            (true, Some(held), Some(endpoint)) => project(held, endpoint, stick),
            _ => stick,
        };

        let palm_center = self.flow.side(side).palm_center;

        OverlaySide::compute(stick, pointer, state, palm_center, self.settings.fade_radius)
    }
}
