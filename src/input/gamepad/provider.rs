//! Frame-sampling gamepad provider with hot-plug support.
//!
//! gilrs is pumped on a dedicated blocking thread (it is not Send-safe).
//! Events mutate a shadow of the active pad's state; once per poll tick the
//! shadow is shaped into an [`InputFrame`] and sent over an unbounded
//! channel to the async side. Frames are absolute snapshots, so consumers
//! never have to reassemble state from deltas.
//!
//! On Windows a direct XInput poll of slot 0 overrides the shadow whenever
//! an XInput device is present (see [`super::xinput`]). One pad is active at
//! a time, picked by the optional `product_match` substring; disconnects are
//! detected every 2 seconds and the first matching pad reconnects
//! automatically.

use super::buttons::PadButton;
use super::frame::{InputFrame, PadButtons};
use super::normalize::{shape_stick, trigger_axis_pressed};
#[cfg(windows)]
use super::normalize::{shape_stick_with_mode, NormMode};
use crate::config::GamepadConfig;
use crate::engine::Side;
use anyhow::Result;
use gilrs::{Axis, Event, EventType, Gilrs};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Raw per-axis values for one stick, before shaping.
#[derive(Debug, Clone, Copy, Default)]
struct RawStick {
    x: f32,
    y: f32,
}

/// Shadow of the active pad. Mutated by gilrs events, sampled every tick.
#[derive(Debug, Default)]
struct PadShadow {
    left: RawStick,
    right: RawStick,
    buttons: PadButtons,
}

impl PadShadow {
    fn apply(&mut self, event: EventType) {
        match event {
            EventType::ButtonPressed(button, _) | EventType::ButtonReleased(button, _) => {
                let pressed = matches!(event, EventType::ButtonPressed(_, _));
                if let Some(named) = PadButton::from_gilrs(button) {
                    self.buttons.set(named, pressed);
                }
            },
            EventType::AxisChanged(axis, value, _) => match axis {
                Axis::LeftStickX => self.left.x = value,
                Axis::LeftStickY => self.left.y = value,
                Axis::RightStickX => self.right.x = value,
                Axis::RightStickY => self.right.y = value,
                // Trigger axes double as buttons on pads that report them
                // as analog values instead of press events
                Axis::LeftZ => self.buttons.lt = trigger_axis_pressed(value),
                Axis::RightZ => self.buttons.rt = trigger_axis_pressed(value),
                _ => {},
            },
            _ => {},
        }
    }

    fn clear(&mut self) {
        *self = PadShadow::default();
    }
}

/// Running provider handle. Dropping it stops the polling thread.
pub struct PadProvider {
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl PadProvider {
    /// Start the polling thread.
    ///
    /// Returns the provider handle and the frame channel. The analog and
    /// pad-selection config are captured at start; changing them requires a
    /// provider restart.
    pub fn start(
        config: GamepadConfig,
        poll_hz: u32,
    ) -> Result<(Self, mpsc::UnboundedReceiver<InputFrame>)> {
        let (frame_tx, frame_rx) = mpsc::unbounded_channel::<InputFrame>();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        // gilrs must be created and pumped on one thread
        std::thread::spawn(move || {
            Self::poll_loop_blocking(config, poll_hz, frame_tx, shutdown_rx);
        });

        Ok((
            Self {
                shutdown_tx: Some(shutdown_tx),
            },
            frame_rx,
        ))
    }

    /// Request the polling thread to stop.
    pub async fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
            info!("Gamepad provider shutdown requested");
        }
    }

    /// Main poll loop (runs in the dedicated blocking thread).
    fn poll_loop_blocking(
        config: GamepadConfig,
        poll_hz: u32,
        frame_tx: mpsc::UnboundedSender<InputFrame>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("GilRs initialized");
                g
            },
            Err(e) => {
                warn!("Failed to initialize GilRs: {:?}", e);
                return;
            },
        };

        #[cfg(windows)]
        let mut xinput = super::xinput::XInputPoller::new();

        let tick = Duration::from_millis(1000 / poll_hz.max(1) as u64);

        // Wait for gamepads to enumerate (Windows Bluetooth controllers
        // need a few seconds before they show up)
        info!("⏳ Scanning for gamepads (3 seconds)...");
        let scan_start = Instant::now();
        while scan_start.elapsed() < Duration::from_secs(3) {
            while let Some(Event { id, event, .. }) = gilrs.next_event() {
                if event == EventType::Connected {
                    debug!("Gamepad connected during initial scan: {:?}", id);
                }
            }
            std::thread::sleep(Duration::from_millis(100));
        }

        let connected: Vec<_> = gilrs
            .gamepads()
            .filter(|(_, gp)| gp.is_connected())
            .map(|(id, gp)| (id, gp.name().to_string()))
            .collect();
        if connected.is_empty() {
            warn!("⚠️  No gamepads detected at all");
        } else {
            info!("Found {} connected gamepad(s):", connected.len());
            for (id, name) in &connected {
                info!("  - {:?}: \"{}\"", id, name);
            }
        }

        let mut active = pick_gamepad(&gilrs, config.product_match.as_deref());
        match active {
            Some(id) => info!("🎮 Using gamepad {:?}: \"{}\"", id, gilrs.gamepad(id).name()),
            None => warn!("⚠️  No gamepad selected; waiting for one to connect"),
        }

        let mut shadow = PadShadow::default();
        let mut seq: u64 = 0;
        let mut last_reconnect_check = Instant::now();
        let reconnect_interval = Duration::from_secs(2);

        loop {
            // Check for shutdown signal (non-blocking)
            match shutdown_rx.try_recv() {
                Ok(_) | Err(mpsc::error::TryRecvError::Disconnected) => {
                    info!("Gamepad provider shutting down");
                    break;
                },
                Err(mpsc::error::TryRecvError::Empty) => {},
            }

            // Reconnection check (every 2 seconds)
            if last_reconnect_check.elapsed() >= reconnect_interval {
                last_reconnect_check = Instant::now();
                let lost = active.map_or(true, |id| !gilrs.gamepad(id).is_connected());
                if lost {
                    if let Some(id) = pick_gamepad(&gilrs, config.product_match.as_deref()) {
                        info!("🔌 Switched to gamepad {:?}: \"{}\"", id, gilrs.gamepad(id).name());
                        active = Some(id);
                        shadow.clear();
                    } else if active.take().is_some() {
                        warn!("⚠️  Active gamepad disconnected");
                        shadow.clear();
                    }
                }
            }

            // Pump gilrs events into the shadow
            while let Some(Event { id, event, .. }) = gilrs.next_event() {
                match event {
                    EventType::Connected => {
                        info!("🔌 Gamepad connected: \"{}\"", gilrs.gamepad(id).name());
                        if active.is_none() {
                            active = pick_gamepad(&gilrs, config.product_match.as_deref());
                            if active == Some(id) {
                                info!("🎮 Using gamepad {:?}", id);
                            }
                        }
                    },
                    EventType::Disconnected => {
                        if active == Some(id) {
                            warn!("⚠️  Active gamepad disconnected");
                            active = None;
                            shadow.clear();
                        }
                    },
                    other => {
                        if active == Some(id) {
                            shadow.apply(other);
                        }
                    },
                }
            }

            seq += 1;
            let mut frame = InputFrame {
                seq,
                left_stick: shape_stick(shadow.left.x, shadow.left.y, Side::Left, &config.analog),
                right_stick: shape_stick(
                    shadow.right.x,
                    shadow.right.y,
                    Side::Right,
                    &config.analog,
                ),
                buttons: shadow.buttons,
            };

            // Direct XInput state takes over the whole frame when present;
            // its raw conversion is already circular, so skip the square
            // mapping stage
            #[cfg(windows)]
            if let Some(sample) = xinput.sample() {
                frame.left_stick = shape_stick_with_mode(
                    sample.left.0,
                    sample.left.1,
                    Side::Left,
                    &config.analog,
                    NormMode::RadialClamp,
                );
                frame.right_stick = shape_stick_with_mode(
                    sample.right.0,
                    sample.right.1,
                    Side::Right,
                    &config.analog,
                    NormMode::RadialClamp,
                );
                frame.buttons = sample.buttons;
            }

            if frame_tx.send(frame).is_err() {
                warn!("Frame receiver dropped, shutting down gamepad loop");
                return;
            }

            std::thread::sleep(tick);
        }
    }
}

impl Drop for PadProvider {
    fn drop(&mut self) {
        // Attempt to send shutdown signal if not already sent
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.try_send(());
        }
    }
}

/// First connected pad whose name contains `product_match`
/// (case-insensitive), or simply the first connected pad.
fn pick_gamepad(gilrs: &Gilrs, product_match: Option<&str>) -> Option<gilrs::GamepadId> {
    let mut pads = gilrs.gamepads().filter(|(_, gp)| gp.is_connected());
    match product_match {
        Some(pattern) => {
            let pattern = pattern.to_lowercase();
            pads.find(|(_, gp)| gp.name().to_lowercase().contains(&pattern))
                .map(|(id, _)| id)
        },
        None => pads.next().map(|(id, _)| id),
    }
}

/// Enumerate connected gamepads to stdout, for `--list-gamepads`.
pub fn list_gamepads() -> Result<()> {
    use colored::*;

    let mut gilrs =
        Gilrs::new().map_err(|e| anyhow::anyhow!("failed to initialize GilRs: {:?}", e))?;

    // Brief pump so freshly connected pads get a chance to enumerate
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        while gilrs.next_event().is_some() {}
        std::thread::sleep(Duration::from_millis(100));
    }

    println!("\n{}", "=== Connected Gamepads ===".bold().cyan());
    let mut count = 0;
    for (id, gamepad) in gilrs.gamepads().filter(|(_, gp)| gp.is_connected()) {
        count += 1;
        println!(
            "  {} {:?}: \"{}\" ({})",
            "•".green(),
            id,
            gamepad.name(),
            if gamepad.is_ff_supported() {
                "force feedback"
            } else {
                "no force feedback"
            }
        );
    }
    if count == 0 {
        println!("  {}", "(none found)".yellow());
    }
    println!();
    Ok(())
}
