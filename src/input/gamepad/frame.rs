//! Assembled per-tick input frames.
//!
//! The provider samples the pad once per poll tick and hands the router a
//! complete [`InputFrame`]: both sticks already normalized plus the state of
//! every tracked button. Frames are absolute snapshots, not deltas, so a
//! dropped frame never desynchronizes downstream edge detection.

use super::buttons::PadButton;
use crate::engine::{Side, StickVector};
use serde::Serialize;

/// XInput button bit flags.
///
/// rusty_xinput doesn't export individual button constants, so they are
/// defined here from the XInput API documentation. Kept outside the Windows-only
/// polling code so the decode stays testable everywhere.
pub mod button_flags {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// State of every tracked button in one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PadButtons {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub lb: bool,
    pub rb: bool,
    pub lt: bool,
    pub rt: bool,
    pub l3: bool,
    pub r3: bool,
    pub minus: bool,
    pub plus: bool,
    pub home: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
}

impl PadButtons {
    /// Read one button by name.
    pub fn get(&self, button: PadButton) -> bool {
        match button {
            PadButton::A => self.a,
            PadButton::B => self.b,
            PadButton::X => self.x,
            PadButton::Y => self.y,
            PadButton::Lb => self.lb,
            PadButton::Rb => self.rb,
            PadButton::Lt => self.lt,
            PadButton::Rt => self.rt,
            PadButton::L3 => self.l3,
            PadButton::R3 => self.r3,
            PadButton::Minus => self.minus,
            PadButton::Plus => self.plus,
            PadButton::Home => self.home,
            PadButton::DpadUp => self.dpad_up,
            PadButton::DpadDown => self.dpad_down,
            PadButton::DpadLeft => self.dpad_left,
            PadButton::DpadRight => self.dpad_right,
        }
    }

    /// Write one button by name.
    pub fn set(&mut self, button: PadButton, pressed: bool) {
        let slot = match button {
            PadButton::A => &mut self.a,
            PadButton::B => &mut self.b,
            PadButton::X => &mut self.x,
            PadButton::Y => &mut self.y,
            PadButton::Lb => &mut self.lb,
            PadButton::Rb => &mut self.rb,
            PadButton::Lt => &mut self.lt,
            PadButton::Rt => &mut self.rt,
            PadButton::L3 => &mut self.l3,
            PadButton::R3 => &mut self.r3,
            PadButton::Minus => &mut self.minus,
            PadButton::Plus => &mut self.plus,
            PadButton::Home => &mut self.home,
            PadButton::DpadUp => &mut self.dpad_up,
            PadButton::DpadDown => &mut self.dpad_down,
            PadButton::DpadLeft => &mut self.dpad_left,
            PadButton::DpadRight => &mut self.dpad_right,
        };
        *slot = pressed;
    }

    /// Decode an XInput `wButtons` word.
    pub fn from_xinput_flags(flags: u16) -> Self {
        Self {
            a: flags & button_flags::A != 0,
            b: flags & button_flags::B != 0,
            x: flags & button_flags::X != 0,
            y: flags & button_flags::Y != 0,
            lb: flags & button_flags::LEFT_SHOULDER != 0,
            rb: flags & button_flags::RIGHT_SHOULDER != 0,
            // Triggers arrive as analog values; the poller folds them into
            // lt/rt separately
            lt: false,
            rt: false,
            l3: flags & button_flags::LEFT_THUMB != 0,
            r3: flags & button_flags::RIGHT_THUMB != 0,
            minus: flags & button_flags::BACK != 0,
            plus: flags & button_flags::START != 0,
            home: false,
            dpad_up: flags & button_flags::DPAD_UP != 0,
            dpad_down: flags & button_flags::DPAD_DOWN != 0,
            dpad_left: flags & button_flags::DPAD_LEFT != 0,
            dpad_right: flags & button_flags::DPAD_RIGHT != 0,
        }
    }

    pub fn any_pressed(&self) -> bool {
        PadButton::ALL.iter().any(|b| self.get(*b))
    }
}

/// One sampled input cycle: both sticks plus the full button state.
///
/// Sticks are normalized to the unit circle with positive `y` up, the frame
/// the mapping engine expects from both polling backends.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct InputFrame {
    /// Monotonic frame counter, for ordering diagnostics.
    pub seq: u64,
    pub left_stick: StickVector,
    pub right_stick: StickVector,
    pub buttons: PadButtons,
}

impl InputFrame {
    pub fn stick(&self, side: Side) -> StickVector {
        match side {
            Side::Left => self.left_stick,
            Side::Right => self.right_stick,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_round_trip() {
        let mut buttons = PadButtons::default();
        assert!(!buttons.any_pressed());

        for b in PadButton::ALL {
            buttons.set(b, true);
            assert!(buttons.get(b), "{}", b);
            buttons.set(b, false);
            assert!(!buttons.get(b), "{}", b);
        }
    }

    #[test]
    fn test_xinput_flags_decode() {
        let flags = button_flags::A | button_flags::LEFT_SHOULDER | button_flags::RIGHT_THUMB;
        let b = PadButtons::from_xinput_flags(flags);
        assert!(b.a && b.lb && b.r3);
        assert!(!b.b && !b.rb && !b.l3);
    }

    #[test]
    fn test_xinput_dpad_decode() {
        let b = PadButtons::from_xinput_flags(button_flags::DPAD_UP | button_flags::DPAD_LEFT);
        assert!(b.dpad_up && b.dpad_left);
        assert!(!b.dpad_down && !b.dpad_right);
    }

    #[test]
    fn test_frame_stick_by_side() {
        let frame = InputFrame {
            seq: 1,
            left_stick: StickVector::new(0.5, 0.0),
            right_stick: StickVector::new(0.0, -0.5),
            buttons: PadButtons::default(),
        };
        assert_eq!(frame.stick(Side::Left), StickVector::new(0.5, 0.0));
        assert_eq!(frame.stick(Side::Right), StickVector::new(0.0, -0.5));
    }
}
