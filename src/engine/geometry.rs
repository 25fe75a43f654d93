//! Angle and sector primitives for dual-stick direction mapping.
//!
//! This module provides the canonical conversions between a normalized stick
//! vector, its heading angle, and the eight 45°-wide directional sectors used
//! by every mapping mode.
//!
//! # Angle Space
//!
//! Headings are measured in degrees, clockwise, with straight up at 0°. This
//! matches how the directional overlay is read by a user holding a pad: up is
//! "north" and angles grow to the right. `atan2` with swapped arguments
//! measures this frame directly (see [`stick_angle`]).
//!
//! # Sectors
//!
//! The circle is split into eight sectors of 45° each. Sector 0 spans
//! `[0°, 45°)` and is therefore *centered* at 22.5°, slightly right of up;
//! sector numbers grow clockwise. Sector arithmetic is cyclic (index 8 wraps
//! to 0).
//!
//! # The Center Sentinel
//!
//! A stick resting at exactly `(0, 0)` has no heading: [`stick_angle`] returns
//! `None` and everything downstream propagates it. This is a deliberate
//! point-deadzone, not a radius deadzone. Radius deadzoning happens in the
//! input gateway before vectors reach this module, and the overlay fades the
//! direction indicator with deflection distance so near-center jitter stays
//! invisible.

use serde::Serialize;

/// Number of directional sectors around the circle.
pub const SECTOR_COUNT: u8 = 8;

/// Angular width of one sector in degrees.
pub const DEGREES_PER_SECTOR: f32 = 45.0;

/// A normalized 2D stick position with each axis in [-1.0, 1.0].
///
/// `(0, 0)` means centered / no input. Positive `y` is up, positive `x` is
/// right. Produced fresh every poll cycle by the input gateway; treated as an
/// immutable value everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StickVector {
    pub x: f32,
    pub y: f32,
}

impl StickVector {
    /// The centered position.
    pub const CENTER: StickVector = StickVector { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from center.
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// True only for the exact center point `(0, 0)`.
    ///
    /// Deliberately an exact comparison: any non-zero deflection, however
    /// small, counts as a defined direction.
    pub fn is_centered(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// One of the eight 45° directional sectors, numbered 0-7 clockwise from up.
///
/// The "no direction" case of the mapping engine is expressed as
/// `Option<Sector>`, so a constructed `Sector` is always valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Sector(u8);

impl Sector {
    /// Build a sector from an index in `0..8`. Out-of-range indices return
    /// `None`.
    pub fn new(index: u8) -> Option<Self> {
        (index < SECTOR_COUNT).then_some(Sector(index))
    }

    /// The sector's index in `0..8`.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The sector directly across the circle: `(index + 4) mod 8`.
    pub fn opposite(self) -> Sector {
        Sector((self.0 + SECTOR_COUNT / 2) % SECTOR_COUNT)
    }

    /// The two neighboring sectors, `(counter-clockwise, clockwise)`.
    ///
    /// Wraps around the circle: sector 0's neighbors are `(7, 1)`.
    ///
    /// # Example
    /// ```
    /// use twinstick_gw::engine::Sector;
    ///
    /// let s0 = Sector::new(0).unwrap();
    /// let (left, right) = s0.adjacent();
    /// assert_eq!(left.index(), 7);
    /// assert_eq!(right.index(), 1);
    /// ```
    pub fn adjacent(self) -> (Sector, Sector) {
        (
            Sector((self.0 + SECTOR_COUNT - 1) % SECTOR_COUNT),
            Sector((self.0 + 1) % SECTOR_COUNT),
        )
    }

    /// Heading of the sector's angular center in degrees:
    /// `index * 45 + 22.5`, wrapped to `[0, 360)`.
    pub fn center_angle(self) -> f32 {
        (self.0 as f32 * DEGREES_PER_SECTOR + DEGREES_PER_SECTOR / 2.0).rem_euclid(360.0)
    }

    /// Unit-circle point at the sector's angular center.
    ///
    /// Inverse of the clockwise-from-up heading convention, so
    /// `x = sin θ, y = cos θ`. Sector 0 (centered 22.5°) maps to a point up
    /// and slightly right; sector 2 (centered 112.5°) to down and right.
    pub fn arc_center(self) -> StickVector {
        let theta = self.center_angle().to_radians();
        StickVector::new(theta.sin(), theta.cos())
    }

    /// Iterate all eight sectors in index order.
    pub fn all() -> impl Iterator<Item = Sector> {
        (0..SECTOR_COUNT).map(Sector)
    }
}

/// Heading of a stick vector in clockwise-from-up degrees, `[0, 360)`.
///
/// Returns `None` only for the exact center `(0, 0)`; every other vector has
/// a defined heading, no matter how small its magnitude.
///
/// # Example
/// ```
/// use twinstick_gw::engine::geometry::stick_angle;
/// use twinstick_gw::engine::StickVector;
///
/// // Straight up is 0°; headings grow clockwise
/// assert_eq!(stick_angle(StickVector::new(0.0, 1.0)), Some(0.0));
/// let right = stick_angle(StickVector::new(1.0, 0.0)).unwrap();
/// assert!((right - 90.0).abs() < 0.001);
/// assert_eq!(stick_angle(StickVector::CENTER), None);
/// ```
pub fn stick_angle(v: StickVector) -> Option<f32> {
    if v.is_centered() {
        return None;
    }

    // atan2 with swapped arguments measures from the +y axis toward +x,
    // which is the clockwise-from-up frame directly. Exactly zero for
    // straight up, so the sector 0 boundary is stable there.
    Some(v.x.atan2(v.y).to_degrees().rem_euclid(360.0))
}

/// Sector containing a heading angle.
///
/// The domain is `[0, 360)`. A floor of exactly 8 (the floating-point edge at
/// 360°) wraps to sector 0.
pub fn sector_from_angle(angle: f32) -> Sector {
    let idx = (angle / DEGREES_PER_SECTOR).floor() as u8;
    if idx >= SECTOR_COUNT {
        Sector(0)
    } else {
        Sector(idx)
    }
}

/// Sector of a stick vector, or `None` at the exact center.
///
/// Convenience composition of [`stick_angle`] and [`sector_from_angle`].
pub fn stick_sector(v: StickVector) -> Option<Sector> {
    stick_angle(v).map(sector_from_angle)
}

/// Shortest circular distance between two headings, in `[0, 180]` degrees.
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}
