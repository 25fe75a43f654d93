//! Touch flow - engine sessions as surface contacts, plus palm patterns

use crate::engine::palm::palm_points;
use crate::engine::{SessionSignal, Side};
use crate::input::gamepad::InputFrame;
use crate::sinks::SurfaceEvent;

impl super::Router {
    /// One touch-mode cycle: advance both trackers, batch simultaneous
    /// updates, and run the palm patterns.
    pub(crate) fn process_touch(&mut self, frame: &InputFrame) -> Vec<SurfaceEvent> {
        let mut out = Vec::new();

        let left_inputs = self.side_inputs(frame, Side::Left);
        let right_inputs = self.side_inputs(frame, Side::Right);
        let left_signal = self.left.advance(left_inputs, &mut self.tracker_events);
        let right_signal = self.right.advance(right_inputs, &mut self.tracker_events);

        // Both sides moving in the same cycle land in one batched update
        match (left_signal, right_signal) {
            (Some(SessionSignal::Update(l)), Some(SessionSignal::Update(r))) => {
                out.push(SurfaceEvent::SessionUpdate {
                    points: vec![(Side::Left, l), (Side::Right, r)],
                });
            },
            (left_signal, right_signal) => {
                push_session_signal(&mut out, Side::Left, left_signal);
                push_session_signal(&mut out, Side::Right, right_signal);
            },
        }

        self.palm_cycle(frame, Side::Left, &mut out);
        self.palm_cycle(frame, Side::Right, &mut out);

        out
    }

    /// Palm pattern edges and movement for one side.
    ///
    /// The pattern is tracked independently of the main session: its button
    /// owes nothing to primary or lock, and its five points follow the stick
    /// as long as the button is held.
    fn palm_cycle(&mut self, frame: &InputFrame, side: Side, out: &mut Vec<SurfaceEvent>) {
        let palm_button = match side {
            Side::Left => self.settings.left.palm,
            Side::Right => self.settings.right.palm,
        };
        let Some(palm_button) = palm_button else {
            return;
        };

        let pressed = frame.buttons.get(palm_button);
        let stick = frame.stick(side);
        let radius = self.settings.palm_radius;

        let flow = self.flow.side_mut(side);
        let was_pressed = flow.prev_palm;
        flow.prev_palm = pressed;

        if pressed && !was_pressed {
            flow.palm_center = Some(stick);
            out.push(SurfaceEvent::PatternOpen {
                side,
                points: palm_points(stick, radius),
            });
        } else if pressed {
            flow.palm_center = Some(stick);
            out.push(SurfaceEvent::PatternMove {
                side,
                points: palm_points(stick, radius),
            });
        } else if was_pressed {
            flow.palm_center = None;
            out.push(SurfaceEvent::PatternClose {
                side,
                points: palm_points(stick, radius),
            });
        }
    }
}

fn push_session_signal(out: &mut Vec<SurfaceEvent>, side: Side, signal: Option<SessionSignal>) {
    match signal {
        Some(SessionSignal::Open(position)) => {
            out.push(SurfaceEvent::SessionOpen { side, position })
        },
        Some(SessionSignal::Update(position)) => out.push(SurfaceEvent::SessionUpdate {
            points: vec![(side, position)],
        }),
        Some(SessionSignal::Close(position)) => {
            out.push(SurfaceEvent::SessionClose { side, position })
        },
        None => {},
    }
}
