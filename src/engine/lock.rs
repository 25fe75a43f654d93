//! Lock endpoint resolution.
//!
//! When a side's lock control is held, the reported position is constrained
//! to a straight rail that starts at the captured direction's arc center and
//! ends opposite it. The far end is not fixed: the region opposite the
//! captured sector has two flanking sectors, and the live stick heading picks
//! whichever of the two the user is steering toward. That one binary choice
//! is all the heading contributes; everything else about the rail is
//! determined by the captured direction alone.

use super::geometry::{angular_distance, Sector};

/// Pick the far endpoint of the lock rail for a captured direction.
///
/// The candidates are the two sectors adjacent to `held.opposite()`. The
/// candidate whose angular center is closer to `heading` wins; an exact tie
/// goes to the counter-clockwise candidate.
///
/// A `None` heading (stick at exact center) yields `None`: no lock decision
/// is possible and the caller must treat the cycle as unlocked.
///
/// # Example
/// ```
/// use twinstick_gw::engine::lock::resolve_lock;
/// use twinstick_gw::engine::Sector;
///
/// // Held up-right (sector 0), steering toward 190°: of the two sectors
/// // flanking the opposite (4), sector 3 at 157.5° is closer than sector 5
/// // at 247.5°
/// let held = Sector::new(0).unwrap();
/// assert_eq!(resolve_lock(held, Some(190.0)), Sector::new(3));
/// ```
pub fn resolve_lock(held: Sector, heading: Option<f32>) -> Option<Sector> {
    let heading = heading?;

    let (left, right) = held.opposite().adjacent();
    let d_left = angular_distance(heading, left.center_angle());
    let d_right = angular_distance(heading, right.center_angle());

    // Strict comparison: ties go left
    if d_left < d_right {
        Some(left)
    } else if d_right < d_left {
        Some(right)
    } else {
        Some(left)
    }
}
