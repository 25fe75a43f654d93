//! Shared normalization for gamepad stick and trigger values.
//!
//! Both polling backends (gilrs everywhere, XInput on Windows) run through
//! the functions here so the mapping engine always sees the same unit-circle
//! frame regardless of where a pad reports from.
//!
//! # Stick Normalization
//!
//! Uses radial (circular) deadzone rather than per-axis (square) deadzone.
//! This ensures diagonal movements can reach full magnitude (1.0) and
//! provides consistent response regardless of direction.
//!
//! The configured deadzone applies in normalized space, after the backend's
//! own raw conversion. Setting it to 0 disables radius deadzoning entirely;
//! the engine still treats only the exact center as "no direction".

use crate::config::AnalogConfig;
use crate::engine::{Side, StickVector};
use serde::{Deserialize, Serialize};

/// XInput left thumbstick deadzone radius.
///
/// Values from Microsoft's XInput documentation.
pub const XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE: i16 = 7849;

/// XInput right thumbstick deadzone radius.
///
/// Right stick has a slightly larger deadzone than left.
pub const XINPUT_GAMEPAD_RIGHT_THUMB_DEADZONE: i16 = 8689;

/// XInput trigger threshold below which input is ignored.
///
/// Triggers report 0-255; values at or below this threshold count as
/// released.
pub const XINPUT_GAMEPAD_TRIGGER_THRESHOLD: u8 = 30;

/// Normalize XInput stick with radial deadzone and radial scaling.
///
/// Uses circular deadzone (not square) and ensures diagonal movements reach
/// magnitude 1.0, where per-axis normalization would stop diagonals at ~0.87.
///
/// # Arguments
/// * `raw_x`, `raw_y` - Raw stick values from XInput (-32768 to 32767)
/// * `deadzone` - Circular deadzone radius (7849 for left stick, 8689 for right stick)
///
/// # Example
/// ```
/// use twinstick_gw::input::gamepad::normalize::{
///     normalize_stick_radial, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE
/// };
///
/// // Centered stick returns zero
/// let (x, y) = normalize_stick_radial(0, 0, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE as f32);
/// assert_eq!((x, y), (0.0, 0.0));
///
/// // Full right returns ~1.0
/// let (x, y) = normalize_stick_radial(32767, 0, XINPUT_GAMEPAD_LEFT_THUMB_DEADZONE as f32);
/// assert!(x > 0.99);
/// ```
pub fn normalize_stick_radial(raw_x: i16, raw_y: i16, deadzone: f32) -> (f32, f32) {
    let x = raw_x as f32;
    let y = raw_y as f32;
    let magnitude = (x * x + y * y).sqrt();

    if magnitude <= deadzone {
        return (0.0, 0.0);
    }

    // Maximum single-axis deflection (NOT diagonal!)
    // Use 32768.0 to handle i16::MIN (-32768) correctly
    const MAX_MAGNITUDE: f32 = 32768.0;

    if deadzone >= MAX_MAGNITUDE {
        return (0.0, 0.0);
    }

    // Radial rescaling: map [deadzone, max_magnitude] -> [0, 1]
    // Diagonals may exceed 1.0 before clamping (expected and correct)
    let normalized_magnitude = ((magnitude - deadzone) / (MAX_MAGNITUDE - deadzone)).min(1.0);
    let scale = normalized_magnitude / magnitude;

    (x * scale, y * scale)
}

/// Circle-mapping mode for pads that report per-axis values.
///
/// Different gamepads shape their raw stick range differently:
/// - Some form a square (corners reach 1,1)
/// - Some form a concave diamond/astroid (diagonals pulled inward)
/// - Some form a circle (already normalized)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormMode {
    /// No transformation beyond clamping positions outside the unit circle.
    /// Use if raw values already form a circle.
    RadialClamp,

    /// Square to circle - shrink diagonals. Use if raw values form a square
    /// (corners reaching 1,1 with magnitude 1.414).
    #[default]
    SquareToCircle,

    /// Astroid/diamond to circle - expand diagonals. Use if raw values form
    /// a concave diamond (diagonals pulled inward, magnitude < 1).
    AstroidToCircle,
}

/// Map square input to circular output.
///
/// Points on the edge of the square map to the edge of the circle
/// (magnitude 1.0); interior points scale proportionally.
///
/// Formula: scale = max(|x|, |y|) / magnitude
pub fn square_to_circle(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude < 0.0001 {
        return (0.0, 0.0);
    }

    // Distance to edge of square in this direction
    let max_axis = x.abs().max(y.abs());
    let scale = max_axis / magnitude;

    (x * scale, y * scale)
}

/// Clamp input to the unit circle.
///
/// Only modifies positions outside the circle by scaling them back to
/// magnitude 1.0; interior positions are preserved exactly.
pub fn radial_clamp(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude <= 1.0 {
        (x, y)
    } else {
        (x / magnitude, y / magnitude)
    }
}

/// Map astroid/concave diamond input to circular output.
///
/// The inverse of [`square_to_circle`]: expands diagonals outward so they
/// reach magnitude 1.0, for pads whose raw diagonals are pulled inward.
pub fn astroid_to_circle(x: f32, y: f32) -> (f32, f32) {
    let magnitude = (x * x + y * y).sqrt();

    if magnitude < 0.0001 {
        return (0.0, 0.0);
    }

    let max_axis = x.abs().max(y.abs());

    if max_axis < 0.0001 {
        return (0.0, 0.0);
    }

    let scale = magnitude / max_axis;

    // Clamp to unit circle in case expansion overshoots
    let out_x = x * scale;
    let out_y = y * scale;
    let out_mag = (out_x * out_x + out_y * out_y).sqrt();

    if out_mag > 1.0 {
        (out_x / out_mag, out_y / out_mag)
    } else {
        (out_x, out_y)
    }
}

/// Apply the selected circle mapping.
pub fn normalize_gilrs_stick(x: f32, y: f32, mode: NormMode) -> (f32, f32) {
    match mode {
        NormMode::RadialClamp => radial_clamp(x, y),
        NormMode::SquareToCircle => square_to_circle(x, y),
        NormMode::AstroidToCircle => astroid_to_circle(x, y),
    }
}

/// Radial deadzone in normalized space.
///
/// Positions inside the deadzone radius collapse to center; the remaining
/// magnitude range rescales to [0, 1] so deflection just outside the
/// deadzone starts from zero instead of jumping.
pub fn radial_deadzone(x: f32, y: f32, deadzone: f32) -> (f32, f32) {
    if deadzone <= 0.0 {
        return (x, y);
    }
    if deadzone >= 1.0 {
        return (0.0, 0.0);
    }

    let magnitude = (x * x + y * y).sqrt();
    if magnitude <= deadzone {
        return (0.0, 0.0);
    }

    let rescaled = ((magnitude - deadzone) / (1.0 - deadzone)).min(1.0);
    let scale = rescaled / magnitude;

    (x * scale, y * scale)
}

/// Full shaping pipeline from backend output to the engine's stick frame.
///
/// Circle mapping, then the configured radial deadzone, then the gamma
/// curve, then per-axis inversion. Both backends feed their unit-range
/// values through here so a config change affects them identically.
pub fn shape_stick(raw_x: f32, raw_y: f32, side: Side, config: &AnalogConfig) -> StickVector {
    shape_stick_with_mode(raw_x, raw_y, side, config, config.norm_mode)
}

/// [`shape_stick`] with the circle mapping chosen by the caller.
///
/// The XInput path passes [`NormMode::RadialClamp`] since its raw conversion
/// already produces circular output; square-mapping it again would shrink
/// diagonals.
pub fn shape_stick_with_mode(
    raw_x: f32,
    raw_y: f32,
    side: Side,
    config: &AnalogConfig,
    mode: NormMode,
) -> StickVector {
    let (x, y) = normalize_gilrs_stick(raw_x, raw_y, mode);
    let (x, y) = radial_deadzone(x, y, config.deadzone);

    // Gamma curve for sensitivity adjustment, applied to the magnitude so
    // direction is preserved
    // gamma > 1.0 = more precise at center, less at edges
    // gamma < 1.0 = less precise at center, more at edges
    let (x, y) = if config.gamma != 1.0 {
        let magnitude = (x * x + y * y).sqrt();
        if magnitude > 0.0 {
            let curved = magnitude.powf(config.gamma).min(1.0);
            let scale = curved / magnitude;
            (x * scale, y * scale)
        } else {
            (x, y)
        }
    } else {
        (x, y)
    };

    let (x_id, y_id) = match side {
        Side::Left => ("lx", "ly"),
        Side::Right => ("rx", "ry"),
    };
    let flip = |value: f32, id: &str| {
        if config.invert.get(id).copied().unwrap_or(false) {
            -value
        } else {
            value
        }
    };

    StickVector::new(flip(x, x_id), flip(y, y_id))
}

/// Whether an XInput trigger value counts as pressed.
///
/// # Example
/// ```
/// use twinstick_gw::input::gamepad::normalize::trigger_pressed;
///
/// assert!(!trigger_pressed(0));
/// assert!(!trigger_pressed(30)); // At threshold, still released
/// assert!(trigger_pressed(31));
/// ```
pub fn trigger_pressed(value: u8) -> bool {
    value > XINPUT_GAMEPAD_TRIGGER_THRESHOLD
}

/// Whether a gilrs trigger axis value counts as pressed.
///
/// Same threshold as [`trigger_pressed`], rescaled to the 0.0-1.0 axis
/// range gilrs reports.
pub fn trigger_axis_pressed(value: f32) -> bool {
    value > XINPUT_GAMEPAD_TRIGGER_THRESHOLD as f32 / 255.0
}
