//! Directional-sector and path-locking engine.
//!
//! The pure core shared by every mapping mode: stick vectors become heading
//! angles and 45° sectors ([`geometry`]), a per-side state machine captures a
//! direction on activation and drives one output session ([`tracker`]), and
//! while the lock control is held the reported position is constrained to a
//! rail between the captured direction and a resolved far endpoint
//! ([`lock`], [`project`]). [`palm`] adds the five-point palm cluster used by
//! the touch flow.
//!
//! Everything here is synchronous and total: no I/O, no allocation beyond
//! the caller-owned diagnostic buffer, no panics. The left and right sides
//! never share state; combining their outputs is the router's job.

pub mod geometry;
pub mod lock;
pub mod palm;
pub mod project;
pub mod tracker;

use serde::{Deserialize, Serialize};

pub use geometry::{stick_angle, stick_sector, Sector, StickVector};
pub use lock::resolve_lock;
pub use project::project;
pub use tracker::{DirectionTracker, SessionSignal, SideInputs, SideState, TrackerEvent};

/// Stick side identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
