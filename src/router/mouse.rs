//! Mouse flow - both sides share a single cursor stream

use crate::engine::{SessionSignal, Side};
use crate::input::gamepad::InputFrame;
use crate::sinks::SurfaceEvent;

impl super::Router {
    /// One mouse-mode cycle. Opens and closes pass through per side; update
    /// positions are arbitrated down to the one point the cursor follows.
    pub(crate) fn process_mouse(&mut self, frame: &InputFrame) -> Vec<SurfaceEvent> {
        let mut out = Vec::new();

        let left_inputs = self.side_inputs(frame, Side::Left);
        let right_inputs = self.side_inputs(frame, Side::Right);
        let left_signal = self.left.advance(left_inputs, &mut self.tracker_events);
        let right_signal = self.right.advance(right_inputs, &mut self.tracker_events);

        for (side, signal) in [(Side::Left, left_signal), (Side::Right, right_signal)] {
            match signal {
                Some(SessionSignal::Open(position)) => {
                    out.push(SurfaceEvent::SessionOpen { side, position })
                },
                Some(SessionSignal::Close(position)) => {
                    out.push(SurfaceEvent::SessionClose { side, position })
                },
                _ => {},
            }
        }

        // One cursor: when both sides stream positions, alternate which one
        // feeds it so neither side starves
        let cursor = match (left_signal, right_signal) {
            (Some(SessionSignal::Update(l)), Some(SessionSignal::Update(r))) => {
                self.flow.mouse_flip = !self.flow.mouse_flip;
                if self.flow.mouse_flip {
                    Some((Side::Left, l))
                } else {
                    Some((Side::Right, r))
                }
            },
            (Some(SessionSignal::Update(l)), _) => Some((Side::Left, l)),
            (_, Some(SessionSignal::Update(r))) => Some((Side::Right, r)),
            _ => None,
        };
        if let Some((side, position)) = cursor {
            out.push(SurfaceEvent::SessionUpdate {
                points: vec![(side, position)],
            });
        }

        // Cursor snaps home once nothing is held anymore
        let any_close = matches!(left_signal, Some(SessionSignal::Close(_)))
            || matches!(right_signal, Some(SessionSignal::Close(_)));
        if any_close && !self.left.session_active() && !self.right.session_active() {
            out.push(SurfaceEvent::PointerRecenter);
        }

        out
    }
}
