//! Point-to-segment projection for locked positions.
//!
//! While a side is locked, the raw stick position is replaced by its closest
//! point on the straight rail between the captured direction's arc center and
//! the resolved endpoint's arc center. Clamping the projection parameter at
//! both ends keeps the reported position on the rail even when the raw stick
//! is far outside the segment's extent (or outside the unit circle entirely).

use super::geometry::{Sector, StickVector};

/// Closest point on the rail `[held's arc center, endpoint's arc center]`
/// to the raw stick position.
///
/// Standard scalar projection with the parameter clamped to the segment, so
/// the result never overshoots either endpoint. The degenerate zero-length
/// rail (held and endpoint coincide, which endpoint resolution never
/// produces) returns the start point.
///
/// # Example
/// ```
/// use twinstick_gw::engine::project::project;
/// use twinstick_gw::engine::{Sector, StickVector};
///
/// let held = Sector::new(0).unwrap();
/// let endpoint = Sector::new(3).unwrap();
///
/// // The rail's start maps to itself
/// let start = held.arc_center();
/// assert_eq!(project(held, endpoint, start), start);
/// ```
pub fn project(held: Sector, endpoint: Sector, stick: StickVector) -> StickVector {
    let start = held.arc_center();
    let end = endpoint.arc_center();

    let path_x = end.x - start.x;
    let path_y = end.y - start.y;
    let path_len = (path_x * path_x + path_y * path_y).sqrt();

    if path_len == 0.0 {
        return start;
    }

    let dir_x = path_x / path_len;
    let dir_y = path_y / path_len;

    // Scalar projection of the stick offset onto the rail, clamped to it
    let t = ((stick.x - start.x) * dir_x + (stick.y - start.y) * dir_y).clamp(0.0, path_len);

    StickVector::new(start.x + t * dir_x, start.y + t * dir_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sector(i: u8) -> Sector {
        Sector::new(i).unwrap()
    }

    fn assert_close(a: StickVector, b: StickVector) {
        assert!(
            (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_start_is_fixed_point() {
        let held = sector(0);
        let endpoint = sector(3);
        assert_eq!(project(held, endpoint, held.arc_center()), held.arc_center());
    }

    #[test]
    fn test_end_is_fixed_point() {
        let held = sector(0);
        let endpoint = sector(3);
        assert_close(project(held, endpoint, endpoint.arc_center()), endpoint.arc_center());
    }

    #[test]
    fn test_interior_projection() {
        // Sectors 0 and 3 center at 22.5° and 157.5°, so the rail is the
        // vertical chord x = sin(22.5°). A stick at full right projects onto
        // the chord at its own height
        let held = sector(0);
        let endpoint = sector(3);
        let p = project(held, endpoint, StickVector::new(1.0, 0.0));
        assert_close(p, StickVector::new(22.5_f32.to_radians().sin(), 0.0));
    }

    #[test]
    fn test_overshoot_clamps_to_endpoints() {
        let held = sector(0);
        let endpoint = sector(3);
        // Far below the rail's bottom end
        let p = project(held, endpoint, StickVector::new(0.4, -3.0));
        assert_close(p, endpoint.arc_center());
        // Far above the rail's top end
        let p = project(held, endpoint, StickVector::new(0.4, 3.0));
        assert_close(p, held.arc_center());
    }

    #[test]
    fn test_degenerate_rail_returns_start() {
        let held = sector(5);
        let p = project(held, held, StickVector::new(0.9, -0.2));
        assert_eq!(p, held.arc_center());
    }

    proptest! {
        #[test]
        fn prop_projection_stays_on_rail(
            held_idx in 0u8..8,
            end_idx in 0u8..8,
            x in -3.0f32..3.0,
            y in -3.0f32..3.0,
        ) {
            let held = Sector::new(held_idx).unwrap();
            let endpoint = Sector::new(end_idx).unwrap();
            let p = project(held, endpoint, StickVector::new(x, y));

            let start = held.arc_center();
            let end = endpoint.arc_center();
            let path = (end.x - start.x, end.y - start.y);
            let len_sq = path.0 * path.0 + path.1 * path.1;

            let dx = p.x - start.x;
            let dy = p.y - start.y;
            if len_sq == 0.0 {
                prop_assert!(dx == 0.0 && dy == 0.0);
            } else {
                // On the rail: expressible as start + u * (end - start) with
                // u in [0, 1] and no perpendicular residual
                let u = (dx * path.0 + dy * path.1) / len_sq;
                prop_assert!((-1e-4..=1.0001).contains(&u), "u = {}", u);
                let residual = dx * path.1 - dy * path.0;
                prop_assert!(residual.abs() < 1e-4, "residual = {}", residual);
            }
        }
    }
}
