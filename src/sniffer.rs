//! Input frame sniffer for debugging and development
//!
//! Dumps assembled input frames as JSON lines so stick shaping and button
//! mappings can be inspected without wiring up a surface.

use anyhow::Result;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::input::gamepad::{InputFrame, PadProvider};

/// Run the CLI frame sniffer until Ctrl+C.
///
/// Frames identical to the previous one are skipped, so an idle pad stays
/// quiet and every printed line is an actual input change.
pub async fn run_frame_sniffer(config: &AppConfig) -> Result<()> {
    println!("{}", "=== Input Frame Sniffer ===".bold().cyan());
    println!("Press Ctrl+C to exit\n");
    println!(
        "{}",
        "Format: one JSON object per changed frame".dimmed()
    );
    println!("{}\n", "─".repeat(80).dimmed());

    let (mut provider, mut frame_rx) =
        PadProvider::start(config.gamepad.clone(), config.poll_hz)?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            running.store(false, Ordering::Relaxed);
        });
    }

    let mut previous: Option<InputFrame> = None;
    while running.load(Ordering::Relaxed) {
        tokio::select! {
            frame = frame_rx.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                if frame_changed(previous.as_ref(), &frame) {
                    println!("{}", serde_json::to_string(&frame)?);
                }
                previous = Some(frame);
            }
            _ = tokio::time::sleep(tokio::time::Duration::from_millis(100)) => {
                // Check if we should exit
                if !running.load(Ordering::Relaxed) {
                    break;
                }
            }
        }
    }

    provider.shutdown().await;
    println!("\n{}", "Sniffer stopped".yellow());
    Ok(())
}

fn frame_changed(previous: Option<&InputFrame>, frame: &InputFrame) -> bool {
    match previous {
        None => true,
        Some(prev) => {
            prev.left_stick != frame.left_stick
                || prev.right_stick != frame.right_stick
                || prev.buttons != frame.buttons
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::StickVector;
    use crate::input::gamepad::{PadButton, PadButtons};

    #[test]
    fn test_frame_changed_detection() {
        let mut frame = InputFrame::default();
        assert!(frame_changed(None, &frame));

        let prev = frame;
        frame.seq = 2;
        // Sequence alone is not a change
        assert!(!frame_changed(Some(&prev), &frame));

        frame.left_stick = StickVector::new(0.1, 0.0);
        assert!(frame_changed(Some(&prev), &frame));

        let mut buttons = PadButtons::default();
        buttons.set(PadButton::A, true);
        let pressed = InputFrame {
            seq: 3,
            left_stick: prev.left_stick,
            right_stick: prev.right_stick,
            buttons,
        };
        assert!(frame_changed(Some(&prev), &pressed));
    }

    #[test]
    fn test_frame_serializes_to_json_line() {
        let frame = InputFrame::default();
        let line = serde_json::to_string(&frame).unwrap();
        assert!(line.starts_with('{'));
        assert!(line.contains("\"seq\":0"));
        assert!(line.contains("left_stick"));
    }
}
