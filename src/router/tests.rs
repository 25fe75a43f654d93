//! Tests for Router module

use super::*;
use crate::config::AppConfig;
use crate::engine::Sector;
use crate::input::gamepad::{PadButton, PadButtons};
use crate::sinks::ChannelSink;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

fn make_test_config(mode: TrackerMode) -> AppConfig {
    let mut config = AppConfig::default();
    config.mode = mode;
    // Give both sides a palm button so pattern flows are reachable
    config.bindings.left.palm = Some("lt".to_string());
    config.bindings.right.palm = Some("rt".to_string());
    config.validate().unwrap();
    config
}

async fn make_test_router(mode: TrackerMode) -> (Router, UnboundedReceiver<SurfaceEvent>) {
    let router = Router::new(make_test_config(mode)).unwrap();
    let (sink, rx) = ChannelSink::new();
    router.register_sink(Arc::new(sink)).await.unwrap();
    (router, rx)
}

fn make_frame(seq: u64, left: (f32, f32), right: (f32, f32), held: &[PadButton]) -> InputFrame {
    let mut buttons = PadButtons::default();
    for button in held {
        buttons.set(*button, true);
    }
    InputFrame {
        seq,
        left_stick: StickVector::new(left.0, left.1),
        right_stick: StickVector::new(right.0, right.1),
        buttons,
    }
}

fn drain(rx: &mut UnboundedReceiver<SurfaceEvent>) -> Vec<SurfaceEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

#[tokio::test]
async fn test_touch_session_open_update_close() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Touch).await;

    // Idle frame emits nothing
    router
        .process_frame(&make_frame(1, (0.0, 0.0), (0.0, 0.0), &[]))
        .await;
    assert!(drain(&mut rx).is_empty());

    // Primary press opens at the current position
    let open_pos = StickVector::new(0.3, 0.4);
    router
        .process_frame(&make_frame(2, (0.3, 0.4), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::SessionOpen {
            side: Side::Left,
            position: open_pos,
        }]
    );

    // Held primary streams single-point updates
    router
        .process_frame(&make_frame(3, (0.5, 0.2), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::SessionUpdate {
            points: vec![(Side::Left, StickVector::new(0.5, 0.2))],
        }]
    );

    // Release closes at the last position
    router
        .process_frame(&make_frame(4, (0.5, 0.2), (0.0, 0.0), &[]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::SessionClose {
            side: Side::Left,
            position: StickVector::new(0.5, 0.2),
        }]
    );
}

#[tokio::test]
async fn test_touch_batches_both_sides() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Touch).await;

    // Both primaries land in the same frame: one open per side
    router
        .process_frame(&make_frame(
            1,
            (0.1, 0.8),
            (-0.6, 0.1),
            &[PadButton::Lb, PadButton::Rb],
        ))
        .await;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        SurfaceEvent::SessionOpen {
            side: Side::Left,
            ..
        }
    ));
    assert!(matches!(
        events[1],
        SurfaceEvent::SessionOpen {
            side: Side::Right,
            ..
        }
    ));

    // Both held: exactly one batched update carrying both points
    router
        .process_frame(&make_frame(
            2,
            (0.2, 0.7),
            (-0.5, 0.2),
            &[PadButton::Lb, PadButton::Rb],
        ))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::SessionUpdate {
            points: vec![
                (Side::Left, StickVector::new(0.2, 0.7)),
                (Side::Right, StickVector::new(-0.5, 0.2)),
            ],
        }]
    );
}

#[tokio::test]
async fn test_touch_lock_projects_updates() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Touch).await;

    // Open straight up: sector 0 captured
    router
        .process_frame(&make_frame(1, (0.0, 1.0), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    drain(&mut rx);

    // Lock pressed while steering down-left (~200°): rail goes 0 → 3
    let steer = (-0.3, -0.8);
    router
        .process_frame(&make_frame(
            2,
            steer,
            (0.0, 0.0),
            &[PadButton::Lb, PadButton::L3],
        ))
        .await;

    let held = Sector::new(0).unwrap();
    let endpoint = Sector::new(3).unwrap();
    let expected = project(held, endpoint, StickVector::new(steer.0, steer.1));
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::SessionUpdate {
            points: vec![(Side::Left, expected)],
        }]
    );

    // Lock released: updates revert to the raw position
    router
        .process_frame(&make_frame(3, steer, (0.0, 0.0), &[PadButton::Lb]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::SessionUpdate {
            points: vec![(Side::Left, StickVector::new(steer.0, steer.1))],
        }]
    );
}

#[tokio::test]
async fn test_mouse_alternates_when_both_active() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Mouse).await;

    router
        .process_frame(&make_frame(
            1,
            (0.1, 0.1),
            (-0.1, -0.1),
            &[PadButton::Lb, PadButton::Rb],
        ))
        .await;
    let opens = drain(&mut rx);
    assert_eq!(opens.len(), 2);

    // With both sessions streaming, the cursor source alternates per frame
    let mut sides = Vec::new();
    for seq in 2..6 {
        router
            .process_frame(&make_frame(
                seq,
                (0.2, 0.2),
                (-0.2, -0.2),
                &[PadButton::Lb, PadButton::Rb],
            ))
            .await;
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        if let SurfaceEvent::SessionUpdate { points } = &events[0] {
            assert_eq!(points.len(), 1);
            sides.push(points[0].0);
        } else {
            panic!("expected an update, got {:?}", events[0]);
        }
    }
    assert_eq!(sides, vec![Side::Left, Side::Right, Side::Left, Side::Right]);
}

#[tokio::test]
async fn test_mouse_recenters_after_last_close() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Mouse).await;

    router
        .process_frame(&make_frame(
            1,
            (0.1, 0.1),
            (-0.1, -0.1),
            &[PadButton::Lb, PadButton::Rb],
        ))
        .await;
    drain(&mut rx);

    // One side closing does not recenter while the other stays active
    router
        .process_frame(&make_frame(2, (0.1, 0.1), (-0.1, -0.1), &[PadButton::Rb]))
        .await;
    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        SurfaceEvent::SessionClose {
            side: Side::Left,
            ..
        }
    )));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SurfaceEvent::PointerRecenter)));

    // Last close recenters the cursor
    router
        .process_frame(&make_frame(3, (0.1, 0.1), (-0.1, -0.1), &[]))
        .await;
    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        SurfaceEvent::SessionClose {
            side: Side::Right,
            ..
        }
    )));
    assert!(events
        .iter()
        .any(|e| matches!(e, SurfaceEvent::PointerRecenter)));
}

#[tokio::test]
async fn test_keys_follow_sector() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Keys).await;

    // Primary with the stick up: sector 0, default label "1"
    router
        .process_frame(&make_frame(1, (0.0, 1.0), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::KeyDown {
            side: Side::Left,
            label: "1".to_string(),
        }]
    );

    // Steer right: sector 2 replaces sector 0
    router
        .process_frame(&make_frame(2, (1.0, 0.0), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![
            SurfaceEvent::KeyUp {
                side: Side::Left,
                label: "1".to_string(),
            },
            SurfaceEvent::KeyDown {
                side: Side::Left,
                label: "3".to_string(),
            },
        ]
    );

    // Centered stick releases without a new press
    router
        .process_frame(&make_frame(3, (0.0, 0.0), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::KeyUp {
            side: Side::Left,
            label: "3".to_string(),
        }]
    );

    // Releasing the primary with nothing held emits nothing
    router
        .process_frame(&make_frame(4, (0.0, 0.0), (0.0, 0.0), &[]))
        .await;
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_keys_conflict_yields_to_other_side() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Keys).await;

    // Left takes label "1"
    router
        .process_frame(&make_frame(1, (0.0, 1.0), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    drain(&mut rx);

    // Right wants the same label: it stays silent
    router
        .process_frame(&make_frame(
            2,
            (0.0, 1.0),
            (0.0, 1.0),
            &[PadButton::Lb, PadButton::Rb],
        ))
        .await;
    assert!(drain(&mut rx).is_empty());

    // Left releases; right picks the label up on the next cycle
    router
        .process_frame(&make_frame(3, (0.0, 1.0), (0.0, 1.0), &[PadButton::Rb]))
        .await;
    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            SurfaceEvent::KeyUp {
                side: Side::Left,
                label: "1".to_string(),
            },
            SurfaceEvent::KeyDown {
                side: Side::Right,
                label: "1".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_keys_ignore_lock_control() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Keys).await;

    // Lock alone neither opens a session nor presses a key
    router
        .process_frame(&make_frame(1, (0.0, 1.0), (0.0, 0.0), &[PadButton::L3]))
        .await;
    assert!(drain(&mut rx).is_empty());

    // With primary + lock held, the label still follows the raw sector
    router
        .process_frame(&make_frame(
            2,
            (0.0, 1.0),
            (0.0, 0.0),
            &[PadButton::Lb, PadButton::L3],
        ))
        .await;
    assert_eq!(
        drain(&mut rx),
        vec![SurfaceEvent::KeyDown {
            side: Side::Left,
            label: "1".to_string(),
        }]
    );

    router
        .process_frame(&make_frame(
            3,
            (1.0, 0.0),
            (0.0, 0.0),
            &[PadButton::Lb, PadButton::L3],
        ))
        .await;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[1], SurfaceEvent::KeyDown { label, .. } if label == "3"));
}

#[tokio::test]
async fn test_palm_pattern_cycle() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Touch).await;

    // Palm button press opens a five-point pattern around the stick
    router
        .process_frame(&make_frame(1, (0.2, 0.3), (0.0, 0.0), &[PadButton::Lt]))
        .await;
    let events = drain(&mut rx);
    assert_eq!(events.len(), 1);
    if let SurfaceEvent::PatternOpen { side, points } = &events[0] {
        assert_eq!(*side, Side::Left);
        assert_eq!(points[0], StickVector::new(0.2, 0.3));
        // Corners sit at palm_radius from the center
        let d = ((points[1].x - 0.2).powi(2) + (points[1].y - 0.3).powi(2)).sqrt();
        assert!((d - 0.35).abs() < 1e-5);
    } else {
        panic!("expected a pattern open, got {:?}", events[0]);
    }

    // Pattern follows the stick while held
    router
        .process_frame(&make_frame(2, (0.4, 0.1), (0.0, 0.0), &[PadButton::Lt]))
        .await;
    let events = drain(&mut rx);
    assert!(
        matches!(&events[0], SurfaceEvent::PatternMove { points, .. } if points[0] == StickVector::new(0.4, 0.1))
    );

    // Release closes at the current position
    router
        .process_frame(&make_frame(3, (0.4, 0.1), (0.0, 0.0), &[]))
        .await;
    let events = drain(&mut rx);
    assert!(
        matches!(&events[0], SurfaceEvent::PatternClose { points, .. } if points[0] == StickVector::new(0.4, 0.1))
    );
}

#[tokio::test]
async fn test_mode_switch_closes_open_flows() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Touch).await;

    // Open a session and a palm pattern
    router
        .process_frame(&make_frame(
            1,
            (0.3, 0.3),
            (0.0, 0.0),
            &[PadButton::Lb, PadButton::Lt],
        ))
        .await;
    drain(&mut rx);

    // Switching to keys closes both before the new mode takes over
    let new_config = make_test_config(TrackerMode::Keys);
    router.update_config(new_config).await.unwrap();

    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, SurfaceEvent::PatternClose { .. })));
    assert!(events.iter().any(|e| matches!(
        e,
        SurfaceEvent::SessionClose {
            side: Side::Left,
            ..
        }
    )));
    assert!(!router.left.session_active());
    assert_eq!(router.settings.mode, TrackerMode::Keys);
}

#[tokio::test]
async fn test_overlay_snapshot_follows_frames() {
    let (mut router, mut rx) = make_test_router(TrackerMode::Touch).await;
    let overlay = router.overlay_handle();

    // Deflection at half the fade radius: half opacity, no session
    router
        .process_frame(&make_frame(9, (0.0, 0.25), (0.0, 0.0), &[]))
        .await;
    drain(&mut rx);

    let snap = overlay.snapshot().await;
    assert_eq!(snap.seq, 9);
    assert_eq!(snap.left.sector.map(|s| s.index()), Some(0));
    assert_eq!(snap.left.indicator_alpha, 127);
    assert_eq!(snap.left.pointer_alpha, 0);
    assert_eq!(snap.right.indicator_alpha, 0);

    // An open session pins both alphas to full
    router
        .process_frame(&make_frame(10, (0.0, 0.25), (0.0, 0.0), &[PadButton::Lb]))
        .await;
    let snap = overlay.snapshot().await;
    assert_eq!(snap.seq, 10);
    assert_eq!(snap.left.indicator_alpha, 255);
    assert_eq!(snap.left.pointer_alpha, 255);
}

#[tokio::test]
async fn test_sink_registration() {
    let router = Router::new(make_test_config(TrackerMode::Touch)).unwrap();
    assert!(router.list_sinks().await.is_empty());

    let (sink, _rx) = ChannelSink::new();
    router.register_sink(Arc::new(sink)).await.unwrap();
    assert_eq!(router.list_sinks().await, vec!["channel".to_string()]);
}
