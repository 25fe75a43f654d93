//! Keys flow - eight virtual keys, one per direction sector
//!
//! While a side's primary is held, the raw stick sector selects one of the
//! configured labels. No lock resolution and no projection here: the sector
//! of the live stick is the whole story.

use crate::engine::{stick_sector, Side, StickVector};
use crate::input::gamepad::InputFrame;
use crate::sinks::SurfaceEvent;

impl super::Router {
    /// One keys-mode cycle
    pub(crate) fn process_keys(&mut self, frame: &InputFrame) -> Vec<SurfaceEvent> {
        let mut out = Vec::new();

        for side in [Side::Left, Side::Right] {
            let mut inputs = self.side_inputs(frame, side);
            // The lock control plays no role in keys mode
            inputs.lock = false;
            match side {
                Side::Left => self.left.advance(inputs, &mut self.tracker_events),
                Side::Right => self.right.advance(inputs, &mut self.tracker_events),
            };
            self.key_cycle(side, inputs.stick, &mut out);
        }

        out
    }

    /// Emit key transitions for one side.
    ///
    /// A label change releases the previous key before pressing the new one.
    /// A centered stick releases without pressing. When the freshly selected
    /// label is already held by the other side, this side releases and
    /// presses nothing this cycle.
    fn key_cycle(&mut self, side: Side, stick: StickVector, out: &mut Vec<SurfaceEvent>) {
        let session_open = self.tracker(side).session_active();
        let desired = if session_open {
            stick_sector(stick)
                .map(|sector| self.settings.labels[sector.index() as usize].clone())
        } else {
            None
        };

        let other_held = self.flow.side(side.other()).held_key.clone();
        let flow = self.flow.side_mut(side);

        if flow.held_key == desired {
            return;
        }

        if let Some(old) = flow.held_key.take() {
            out.push(SurfaceEvent::KeyUp { side, label: old });
        }

        if let Some(new) = desired {
            if other_held.as_deref() == Some(new.as_str()) {
                return;
            }
            out.push(SurfaceEvent::KeyDown {
                side,
                label: new.clone(),
            });
            flow.held_key = Some(new);
        }
    }
}
