//! Per-side capture and session state machine.
//!
//! Each stick side owns one [`DirectionTracker`]. Every poll cycle the
//! tracker consumes the side's raw booleans and stick vector, edge-detects
//! the two controls, and emits at most one session signal toward the output
//! surface:
//!
//! ```text
//! IDLE --activation press--> ACTIVE            capture direction, open session
//! ACTIVE --lock held, heading known--> LOCKED  endpoint resolved each cycle
//! LOCKED --lock released--> ACTIVE             position reverts to raw
//! ACTIVE/LOCKED --all controls released--> IDLE  close session, clear capture
//! ```
//!
//! The two controls are symmetric activators: either press alone opens the
//! session and captures the direction under the stick at that instant. The
//! session closes only when the last held control is released; releasing one
//! while the other stays down keeps the session (and, for the lock control,
//! merely unlocks).
//!
//! The left and right trackers share no state. Cross-side concerns (batching
//! both sides' updates into one emission) belong to the caller.
//!
//! Diagnostics are pushed into a caller-owned event buffer instead of any
//! process-wide statics, so embedders decide what to log or count.

use super::geometry::{sector_from_angle, stick_angle, Sector, StickVector};
use super::lock::resolve_lock;
use super::project::project;
use super::Side;

/// Raw inputs for one side, sampled once per poll cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideInputs {
    pub stick: StickVector,
    /// Primary activation control (a bumper under the default bindings).
    pub primary: bool,
    /// Lock control (a stick click under the default bindings).
    pub lock: bool,
}

/// Session signal toward the output surface. At most one per side per cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionSignal {
    /// A session opened at the given stick position.
    Open(StickVector),
    /// The session's position this cycle: raw stick when unlocked, the
    /// rail projection when locked.
    Update(StickVector),
    /// The session closed at the given stick position.
    Close(StickVector),
}

/// Structured diagnostic emitted by the tracker.
///
/// Drained by the caller after each cycle; the router logs them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerEvent {
    /// A session opened and captured the direction under the stick
    /// (`None` when the stick sat at exact center).
    DirectionCaptured { side: Side, sector: Option<Sector> },
    /// The lock engaged or its endpoint moved to the other candidate.
    LockEngaged { side: Side, held: Sector, endpoint: Sector },
    /// The lock disengaged (control released or session closed).
    LockReleased { side: Side },
}

/// Mutable per-side record. Zero-initialized when a mode starts; discarded
/// when it ends or the controller is reselected.
#[derive(Debug, Clone, Default)]
pub struct SideState {
    /// Sector captured at the activation edge that opened the session.
    pub held_direction: Option<Sector>,
    /// Whether this side has an open output session.
    pub touch_active: bool,
    /// Whether the lock currently constrains the reported position.
    pub locked: bool,
    /// Far endpoint of the lock rail, meaningful only while `locked`.
    pub locked_endpoint: Option<Sector>,
    prev_primary: bool,
    prev_lock: bool,
}

/// The per-side state machine.
#[derive(Debug)]
pub struct DirectionTracker {
    side: Side,
    state: SideState,
}

impl DirectionTracker {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            state: SideState::default(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> &SideState {
        &self.state
    }

    /// Whether this side currently has an open session.
    pub fn session_active(&self) -> bool {
        self.state.touch_active
    }

    /// Advance one poll cycle.
    ///
    /// Returns the side's session signal for this cycle, if any. Diagnostic
    /// events are appended to `events`.
    pub fn advance(
        &mut self,
        inputs: SideInputs,
        events: &mut Vec<TrackerEvent>,
    ) -> Option<SessionSignal> {
        let angle = stick_angle(inputs.stick);
        let sector = angle.map(sector_from_angle);

        let primary_pressed = inputs.primary && !self.state.prev_primary;
        let lock_pressed = inputs.lock && !self.state.prev_lock;
        let any_held = inputs.primary || inputs.lock;
        let was_open = self.state.touch_active;

        self.state.prev_primary = inputs.primary;
        self.state.prev_lock = inputs.lock;

        // Either control's press edge opens the session and captures the
        // direction under the stick at that instant. A press while the
        // session is already open never recaptures.
        if (primary_pressed || lock_pressed) && !was_open {
            self.state.held_direction = sector;
            self.state.touch_active = true;
            events.push(TrackerEvent::DirectionCaptured {
                side: self.side,
                sector,
            });
            return Some(SessionSignal::Open(inputs.stick));
        }

        if !was_open {
            return None;
        }

        // Last held control released this cycle: tear down atomically. The
        // lock does not get a separate unlock cycle first.
        if !any_held {
            if self.state.locked {
                events.push(TrackerEvent::LockReleased { side: self.side });
            }
            self.state.locked = false;
            self.state.locked_endpoint = None;
            self.state.held_direction = None;
            self.state.touch_active = false;
            return Some(SessionSignal::Close(inputs.stick));
        }

        // Session continues: lock gate, then position
        if inputs.lock {
            if let Some(held) = self.state.held_direction {
                if let Some(endpoint) = resolve_lock(held, angle) {
                    let moved = self.state.locked_endpoint != Some(endpoint);
                    if !self.state.locked || moved {
                        events.push(TrackerEvent::LockEngaged {
                            side: self.side,
                            held,
                            endpoint,
                        });
                    }
                    self.state.locked = true;
                    self.state.locked_endpoint = Some(endpoint);
                    return Some(SessionSignal::Update(project(held, endpoint, inputs.stick)));
                }
            }
            // Lock held but no captured direction or no heading: stay raw
            self.unlock(events);
            return Some(SessionSignal::Update(inputs.stick));
        }

        self.unlock(events);
        Some(SessionSignal::Update(inputs.stick))
    }

    /// Force-close the side, used when the owning mode stops or the
    /// controller is reselected. Signals a close at center if a session was
    /// open.
    pub fn reset(&mut self, events: &mut Vec<TrackerEvent>) -> Option<SessionSignal> {
        let was_open = self.state.touch_active;
        if self.state.locked {
            events.push(TrackerEvent::LockReleased { side: self.side });
        }
        self.state = SideState::default();
        was_open.then_some(SessionSignal::Close(StickVector::CENTER))
    }

    fn unlock(&mut self, events: &mut Vec<TrackerEvent>) {
        if self.state.locked {
            events.push(TrackerEvent::LockReleased { side: self.side });
        }
        self.state.locked = false;
        self.state.locked_endpoint = None;
    }
}
