//! Shared button vocabulary for gamepad controls.
//!
//! Config bindings, assembled input frames, and both polling backends all
//! speak the same Xbox-style button names defined here. Third-party
//! controllers (like FaceOff) typically report through gilrs using Nintendo
//! physical layout, where face-button positions differ from Xbox
//! conventions; the gilrs mapping below assumes that layout:
//!
//! ```text
//!       [X/North]           (top)
//!   [Y/West] [A/East]       (left/right)
//!       [B/South]           (bottom)
//! ```

use gilrs::Button;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// A named pad control, the unit the binding config points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PadButton {
    A,
    B,
    X,
    Y,
    Lb,
    Rb,
    Lt,
    Rt,
    L3,
    R3,
    Minus,
    Plus,
    Home,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

/// A binding string that names no known button.
#[derive(Debug, Error, PartialEq)]
#[error("unknown button name: {0:?}")]
pub struct UnknownButton(pub String);

impl PadButton {
    /// Every button, in display order.
    pub const ALL: [PadButton; 17] = [
        PadButton::A,
        PadButton::B,
        PadButton::X,
        PadButton::Y,
        PadButton::Lb,
        PadButton::Rb,
        PadButton::Lt,
        PadButton::Rt,
        PadButton::L3,
        PadButton::R3,
        PadButton::Minus,
        PadButton::Plus,
        PadButton::Home,
        PadButton::DpadUp,
        PadButton::DpadDown,
        PadButton::DpadLeft,
        PadButton::DpadRight,
    ];

    /// The config-facing name of the button.
    pub fn name(self) -> &'static str {
        match self {
            PadButton::A => "a",
            PadButton::B => "b",
            PadButton::X => "x",
            PadButton::Y => "y",
            PadButton::Lb => "lb",
            PadButton::Rb => "rb",
            PadButton::Lt => "lt",
            PadButton::Rt => "rt",
            PadButton::L3 => "l3",
            PadButton::R3 => "r3",
            PadButton::Minus => "minus",
            PadButton::Plus => "plus",
            PadButton::Home => "home",
            PadButton::DpadUp => "dpad_up",
            PadButton::DpadDown => "dpad_down",
            PadButton::DpadLeft => "dpad_left",
            PadButton::DpadRight => "dpad_right",
        }
    }

    /// Map a gilrs button position to its name here.
    ///
    /// Nintendo physical layout (what most third-party controllers report):
    /// East is `a`, South is `b`, North is `x`, West is `y`. Returns `None`
    /// for positions this gateway does not track.
    pub fn from_gilrs(button: Button) -> Option<PadButton> {
        match button {
            // Face buttons (Nintendo layout -> Xbox names)
            Button::East => Some(PadButton::A),
            Button::South => Some(PadButton::B),
            Button::North => Some(PadButton::X),
            Button::West => Some(PadButton::Y),

            // Shoulder buttons and triggers-as-buttons
            Button::LeftTrigger => Some(PadButton::Lb),
            Button::RightTrigger => Some(PadButton::Rb),
            Button::LeftTrigger2 => Some(PadButton::Lt),
            Button::RightTrigger2 => Some(PadButton::Rt),

            // Menu buttons
            Button::Select => Some(PadButton::Minus),
            Button::Start => Some(PadButton::Plus),
            Button::Mode => Some(PadButton::Home),

            // Stick clicks
            Button::LeftThumb => Some(PadButton::L3),
            Button::RightThumb => Some(PadButton::R3),

            Button::DPadUp => Some(PadButton::DpadUp),
            Button::DPadDown => Some(PadButton::DpadDown),
            Button::DPadLeft => Some(PadButton::DpadLeft),
            Button::DPadRight => Some(PadButton::DpadRight),

            other => {
                warn!("Unknown gilrs button: {:?}", other);
                None
            },
        }
    }
}

impl FromStr for PadButton {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PadButton::ALL
            .iter()
            .copied()
            .find(|b| b.name() == s)
            .ok_or_else(|| UnknownButton(s.to_string()))
    }
}

impl std::fmt::Display for PadButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
