use glam::Vec2;

use crate::types::{Aabb, SweepResult};

/// Earliest time of impact of `moving` translated by `vel` over a unit time
/// interval against the fixed box `fixed`.
///
/// Per-axis slab test against the Minkowski-expanded target, so the moving
/// box collapses to a point. Contract:
/// - already overlapping at t=0 -> hit at 0.0
/// - first touch at some t <= 1 -> hit at t (touch exactly at the end of the
///   interval reports 1.0)
/// - no contact within the interval -> miss, toi 1.0
/// - zero-length velocity degrades to a static overlap test
///
/// An axis with no velocity component requires strict overlap: a box flush
/// against a neighbor on a non-moving axis is not in contact. Without this
/// tie-break a box resting on a floor would read as colliding with every
/// tile it slides past, and a box hugging a wall could never fall along it.
pub fn swept_toi(moving: &Aabb, vel: Vec2, fixed: &Aabb) -> SweepResult {
    let expand = moving.half_extents + fixed.half_extents;
    let delta = fixed.center - moving.center;

    let mut entry = f32::NEG_INFINITY;
    let mut exit = f32::INFINITY;

    for axis in 0..2 {
        let d = delta[axis];
        let e = expand[axis];
        let v = vel[axis];

        if v == 0.0 {
            // Strict overlap required on a non-moving axis.
            if d.abs() >= e {
                return SweepResult::MISS;
            }
        } else {
            let inv = 1.0 / v;
            let mut t1 = (d - e) * inv;
            let mut t2 = (d + e) * inv;
            if t1 > t2 {
                core::mem::swap(&mut t1, &mut t2);
            }
            if t1 > entry {
                entry = t1;
            }
            if t2 < exit {
                exit = t2;
            }
            if entry > exit {
                return SweepResult::MISS;
            }
        }
    }

    // Contact interval entirely behind the motion: separated and receding,
    // or touching a face we are moving away from.
    if exit <= 0.0 {
        return SweepResult::MISS;
    }
    if entry > 1.0 {
        return SweepResult::MISS;
    }

    SweepResult::hit_at(entry.max(0.0))
}

/// Static overlap test, edge touch included (the hazard query wants a box
/// standing flush on a lava tile to count).
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    let d = b.center - a.center;
    let e = a.half_extents + b.half_extents;
    d.x.abs() <= e.x && d.y.abs() <= e.y
}
