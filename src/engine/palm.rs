//! Five-point palm pattern geometry.
//!
//! An optional per-side palm control opens five simultaneous contact points
//! arranged as an X: the stick position itself plus four corners of a square
//! rotated 45°, so the corner points sit on the diagonals at the configured
//! center-to-corner radius. Surfaces that dismiss single touches as noise
//! accept this cluster as a palm.

use super::geometry::StickVector;
use std::f32::consts::FRAC_1_SQRT_2;

/// Contact count of the pattern.
pub const PALM_POINT_COUNT: usize = 5;

/// Build the pattern around `center` with the given center-to-corner
/// `radius` (stick units).
///
/// Point order is stable so consumers can key contact identities off the
/// index: center, then upper-left, upper-right, lower-left, lower-right.
/// Corners may leave the [-1, 1] square when the center is near an edge;
/// consumers clamp to their own surface bounds.
pub fn palm_points(center: StickVector, radius: f32) -> [StickVector; PALM_POINT_COUNT] {
    // Corner points sit on the diagonals, so each axis offset is r·√2/2
    let offset = radius * FRAC_1_SQRT_2;
    [
        center,
        StickVector::new(center.x - offset, center.y + offset),
        StickVector::new(center.x + offset, center.y + offset),
        StickVector::new(center.x - offset, center.y - offset),
        StickVector::new(center.x + offset, center.y - offset),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_point_is_first() {
        let c = StickVector::new(0.1, -0.2);
        let pts = palm_points(c, 0.35);
        assert_eq!(pts[0], c);
    }

    #[test]
    fn test_corners_at_radius() {
        let pts = palm_points(StickVector::CENTER, 0.35);
        for corner in &pts[1..] {
            let d = corner.magnitude();
            assert!((d - 0.35).abs() < 1e-6, "corner distance was {}", d);
        }
    }

    #[test]
    fn test_corner_layout() {
        let pts = palm_points(StickVector::CENTER, 1.0);
        // upper-left, upper-right, lower-left, lower-right
        assert!(pts[1].x < 0.0 && pts[1].y > 0.0);
        assert!(pts[2].x > 0.0 && pts[2].y > 0.0);
        assert!(pts[3].x < 0.0 && pts[3].y < 0.0);
        assert!(pts[4].x > 0.0 && pts[4].y < 0.0);
    }

    #[test]
    fn test_zero_radius_collapses() {
        let c = StickVector::new(0.4, 0.4);
        for p in palm_points(c, 0.0) {
            assert_eq!(p, c);
        }
    }
}
