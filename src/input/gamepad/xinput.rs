//! Direct XInput polling (Windows only).
//!
//! rusty_xinput needs no window or message pump, reports trigger values
//! gilrs hides behind button events on some pads, and keeps working when a
//! controller enumerates only through the XInput stack. When a device is
//! present on slot 0 its state replaces the gilrs shadow for the whole
//! frame, so the two backends never interleave.

use super::frame::PadButtons;
use super::normalize::{
    normalize_stick_radial, trigger_pressed, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE,
    XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE,
};
use rusty_xinput::{XInputHandle, XInputUsageError};
use tracing::{info, warn};

/// One sampled XInput state, sticks already normalized to the unit circle.
#[derive(Debug, Clone, Copy)]
pub struct XInputSample {
    pub left: (f32, f32),
    pub right: (f32, f32),
    pub buttons: PadButtons,
}

/// Poller for XInput slot 0.
pub struct XInputPoller {
    handle: Option<XInputHandle>,
    device_seen: bool,
    load_warned: bool,
}

impl XInputPoller {
    pub fn new() -> Self {
        let handle = match XInputHandle::load_default() {
            Ok(h) => {
                info!("XInput runtime loaded");
                Some(h)
            },
            Err(e) => {
                warn!("XInput runtime unavailable: {:?}; gilrs only", e);
                None
            },
        };
        Self {
            handle,
            device_seen: false,
            load_warned: false,
        }
    }

    /// Poll slot 0. Returns `None` when no XInput device is connected (the
    /// gilrs shadow stays authoritative for that frame).
    pub fn sample(&mut self) -> Option<XInputSample> {
        let handle = self.handle.as_ref()?;

        let state = match handle.get_state(0) {
            Ok(state) => state,
            Err(XInputUsageError::DeviceNotConnected) => {
                if self.device_seen {
                    warn!("XInput device on slot 0 disconnected");
                    self.device_seen = false;
                }
                return None;
            },
            Err(e) => {
                if !self.load_warned {
                    warn!("XInput poll failed: {:?}", e);
                    self.load_warned = true;
                }
                return None;
            },
        };

        if !self.device_seen {
            info!("🎮 XInput device detected on slot 0; using direct polling");
            self.device_seen = true;
        }

        let pad = &state.raw.Gamepad;
        let left = normalize_stick_radial(
            pad.sThumbLX,
            pad.sThumbLY,
            XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE as f32,
        );
        let right = normalize_stick_radial(
            pad.sThumbRX,
            pad.sThumbRY,
            XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE as f32,
        );

        let mut buttons = PadButtons::from_xinput_flags(pad.wButtons);
        buttons.lt = trigger_pressed(state.left_trigger());
        buttons.rt = trigger_pressed(state.right_trigger());

        Some(XInputSample {
            left,
            right,
            buttons,
        })
    }
}
