//! Overlay feed for display consumers
//!
//! The router publishes an [`OverlayFrame`] after every poll cycle. Nothing
//! here draws anything: display front-ends read the latest frame from the
//! shared handle and render it however they like.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::engine::{stick_angle, stick_sector, Sector, SideState, StickVector};

/// Per-side overlay values for one cycle
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OverlaySide {
    /// Shaped stick position
    pub stick: StickVector,
    /// Heading in degrees, clockwise from straight up
    pub angle: Option<f32>,
    /// Sector under the heading
    pub sector: Option<Sector>,
    /// Direction indicator opacity (0-255)
    pub indicator_alpha: u8,
    /// Pointer position: projected onto the rail while locked, raw otherwise
    pub pointer: StickVector,
    /// Pointer opacity: fully visible iff the session is open
    pub pointer_alpha: u8,
    /// Pattern center while a palm pattern is down
    pub palm_center: Option<StickVector>,
}

impl OverlaySide {
    /// Compute overlay values for one side.
    ///
    /// While the session is open or the direction is locked the indicator is
    /// fully opaque. Otherwise it fades in with stick deflection, reaching
    /// full opacity at `fade_radius`.
    pub fn compute(
        stick: StickVector,
        pointer: StickVector,
        state: &SideState,
        palm_center: Option<StickVector>,
        fade_radius: f32,
    ) -> Self {
        let indicator_alpha = if state.touch_active || state.locked {
            255
        } else {
            let fade = (stick.magnitude() / fade_radius).min(1.0);
            (fade * 255.0) as u8
        };

        let pointer_alpha = if state.touch_active { 255 } else { 0 };

        Self {
            stick,
            angle: stick_angle(stick),
            sector: stick_sector(stick),
            indicator_alpha,
            pointer,
            pointer_alpha,
            palm_center,
        }
    }
}

/// Complete overlay snapshot for one cycle
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OverlayFrame {
    /// Input frame sequence number this snapshot was built from
    pub seq: u64,
    pub left: OverlaySide,
    pub right: OverlaySide,
}

/// Shared handle display consumers read the latest frame from
#[derive(Clone, Default)]
pub struct OverlayHandle {
    shared: Arc<RwLock<OverlayFrame>>,
}

impl OverlayHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published frame
    pub async fn publish(&self, frame: OverlayFrame) {
        *self.shared.write().await = frame;
    }

    /// Copy of the most recently published frame
    pub async fn snapshot(&self) -> OverlayFrame {
        *self.shared.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_state() -> SideState {
        SideState::default()
    }

    #[test]
    fn test_indicator_fades_with_deflection() {
        let state = idle_state();

        // Centered stick: invisible
        let side = OverlaySide::compute(
            StickVector::CENTER,
            StickVector::CENTER,
            &state,
            None,
            0.5,
        );
        assert_eq!(side.indicator_alpha, 0);
        assert_eq!(side.pointer_alpha, 0);
        assert!(side.sector.is_none());

        // Quarter of the fade radius: quarter opacity
        let stick = StickVector::new(0.125, 0.0);
        let side = OverlaySide::compute(stick, stick, &state, None, 0.5);
        assert_eq!(side.indicator_alpha, (0.25f32 * 255.0) as u8);

        // At or past the fade radius: fully opaque
        let stick = StickVector::new(0.0, 0.9);
        let side = OverlaySide::compute(stick, stick, &state, None, 0.5);
        assert_eq!(side.indicator_alpha, 255);
    }

    #[test]
    fn test_open_session_is_fully_opaque() {
        let mut state = idle_state();
        state.touch_active = true;

        let stick = StickVector::new(0.01, 0.0);
        let side = OverlaySide::compute(stick, stick, &state, None, 0.5);
        assert_eq!(side.indicator_alpha, 255);
        assert_eq!(side.pointer_alpha, 255);
    }

    #[test]
    fn test_locked_without_session_shows_indicator_only() {
        let mut state = idle_state();
        state.locked = true;

        let stick = StickVector::new(0.01, 0.0);
        let side = OverlaySide::compute(stick, stick, &state, None, 0.5);
        assert_eq!(side.indicator_alpha, 255);
        assert_eq!(side.pointer_alpha, 0);
    }

    #[test]
    fn test_sector_and_angle_follow_stick() {
        let state = idle_state();
        let stick = StickVector::new(0.0, 1.0);
        let side = OverlaySide::compute(stick, stick, &state, None, 0.5);
        assert_eq!(side.angle, Some(0.0));
        assert_eq!(side.sector.map(|s| s.index()), Some(0));
    }

    #[tokio::test]
    async fn test_handle_publishes_latest_frame() {
        let handle = OverlayHandle::new();
        assert_eq!(handle.snapshot().await.seq, 0);

        let mut frame = OverlayFrame::default();
        frame.seq = 7;
        frame.left.indicator_alpha = 255;
        handle.publish(frame).await;

        let snap = handle.snapshot().await;
        assert_eq!(snap.seq, 7);
        assert_eq!(snap.left.indicator_alpha, 255);

        // Reading twice returns the same frame
        assert_eq!(handle.snapshot().await.seq, 7);
    }
}
