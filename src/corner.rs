//! Legacy corner-sampling resolver.
//!
//! The predecessor of the swept resolver: samples the four tiles under the
//! hitbox's corners and pushes the box out of interpenetration with a
//! positional correction delta instead of a time-of-impact fraction. Weak
//! near corner-only contacts and assumes colliders never touch with just
//! corners; kept as a fallback because its flush-contact classification is
//! still useful for low-speed callers.

use glam::Vec2;

use crate::api::TileSource;
use crate::types::{Aabb, Contacts};

/// Escape direction for an overlapped edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Push {
    /// Pushed downward: ceiling overhead.
    Down,
    /// Pushed upward: standing in the floor.
    Up,
    /// Pushed right: wall on the left.
    Right,
    /// Pushed left: wall on the right.
    Left,
}

/// Contact flags plus the correction delta that moves the hitbox out of any
/// interpenetration. `velocity` only disambiguates single-corner overlaps;
/// it is not integrated.
pub fn resolve_overlap<T: TileSource>(
    tiles: &T,
    hitbox: &Aabb,
    velocity: Vec2,
) -> (Contacts, Vec2) {
    let ts = tiles.tile_size();
    assert!(ts > 0.0, "tile size must be positive");
    let size = hitbox.size();
    assert!(
        size.x < ts && size.y < ts,
        "hitbox must be strictly smaller than one tile"
    );

    let corner = hitbox.min();
    let cx = (corner.x / ts).floor() as i32;
    let cy = (corner.y / ts).floor() as i32;

    let top_left = tiles.is_solid(cx, cy);
    let top_right = tiles.is_solid(cx + 1, cy);
    let bottom_left = tiles.is_solid(cx, cy + 1);
    let bottom_right = tiles.is_solid(cx + 1, cy + 1);

    if !(top_left || top_right || bottom_left || bottom_right) {
        return (Contacts::default(), Vec2::ZERO);
    }

    // Whether the box actually spans into the right/lower neighbor cell.
    let spans_right = corner.x.rem_euclid(ts) + size.x > ts;
    let spans_down = corner.y.rem_euclid(ts) + size.y > ts;

    let mut top_left_fix = top_left;
    let mut top_right_fix = top_right;
    let mut bottom_left_fix = bottom_left;
    let mut bottom_right_fix = bottom_right;

    let mut pushes: Vec<Push> = Vec::new();

    // Full edges first; a solid pair claims both of its corners.
    if top_left && top_right {
        pushes.push(Push::Down);
        top_left_fix = false;
        top_right_fix = false;
    }
    if bottom_left && bottom_right {
        if spans_down {
            pushes.push(Push::Up);
        }
        bottom_left_fix = false;
        bottom_right_fix = false;
    }
    if top_left && bottom_left {
        pushes.push(Push::Right);
        top_left_fix = false;
        bottom_left_fix = false;
    }
    if top_right && bottom_right {
        if spans_right {
            pushes.push(Push::Left);
        }
        top_right_fix = false;
        bottom_right_fix = false;
    }

    // Leftover single corners: the velocity sign picks which way to escape.
    if top_left_fix {
        if velocity.x >= 0.0 {
            pushes.push(Push::Down);
        } else {
            pushes.push(Push::Right);
        }
    }
    if top_right_fix {
        if velocity.x <= 0.0 {
            pushes.push(Push::Down);
        } else if spans_right {
            pushes.push(Push::Left);
        }
    }
    if bottom_left_fix && velocity.x >= 0.0 {
        if spans_down {
            pushes.push(Push::Up);
        } else {
            pushes.push(Push::Right);
        }
    }
    if bottom_right_fix && velocity.x <= 0.0 {
        if spans_down {
            pushes.push(Push::Up);
        } else if spans_right {
            pushes.push(Push::Left);
        }
    }

    let mut contacts = Contacts::default();
    let mut delta = Vec2::ZERO;

    for push in pushes {
        match push {
            Push::Down => {
                contacts.ceiling = true;
                delta.y = ts - corner.y.rem_euclid(ts);
            }
            Push::Up => {
                contacts.grounded = true;
                delta.y = -(corner.y + size.y).rem_euclid(ts);
            }
            Push::Right => {
                contacts.wall_left = true;
                delta.x = ts - corner.x.rem_euclid(ts);
            }
            Push::Left => {
                contacts.wall_right = true;
                delta.x = -corner.x.rem_euclid(ts);
            }
        }
    }

    // Ground re-check against the moved box: a box flush on the floor has
    // nothing to push out but is still grounded.
    let ground_level = cy as f32 * ts;
    let ground_center = (cx + 1) as f32 * ts;
    let moved_bottom = corner.y + size.y + delta.y;
    let moved_left = corner.x + delta.x;
    let moved_right = corner.x + size.x + delta.x;
    if moved_bottom + 1.0 >= ground_level {
        if bottom_left && moved_left < ground_center {
            contacts.grounded = true;
        }
        if bottom_right && moved_right >= ground_center {
            contacts.grounded = true;
        }
    }

    (contacts, delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;

    fn floor_and_wall() -> TileGrid {
        TileGrid::from_ascii(
            "\
            .....#..\n\
            .....#..\n\
            .....#..\n\
            ########",
            16,
        )
    }

    fn box_at(x: f32, y: f32) -> Aabb {
        Aabb::from_corner_size(Vec2::new(x, y), Vec2::new(10.0, 12.0))
    }

    #[test]
    fn test_clear_space_reports_nothing() {
        let g = floor_and_wall();
        let (c, d) = resolve_overlap(&g, &box_at(20.0, 20.0), Vec2::new(3.0, 0.0));
        assert_eq!(c, Contacts::default());
        assert_eq!(d, Vec2::ZERO);
    }

    #[test]
    fn test_floor_penetration_pushed_up() {
        let g = floor_and_wall();
        // Bottom edge 2px into the floor (floor top at y=48).
        let (c, d) = resolve_overlap(&g, &box_at(18.0, 38.0), Vec2::new(0.0, 4.0));
        assert!(c.grounded);
        assert!(!c.ceiling);
        assert_eq!(d, Vec2::new(0.0, -2.0));
    }

    #[test]
    fn test_flush_rest_is_grounded_without_push() {
        let g = floor_and_wall();
        let (c, d) = resolve_overlap(&g, &box_at(18.0, 36.0), Vec2::ZERO);
        assert!(c.grounded);
        assert_eq!(d, Vec2::ZERO);
    }

    #[test]
    fn test_wall_penetration_from_left() {
        let g = floor_and_wall();
        // Right edge 2px into the wall column (wall left face at x=80).
        let (c, d) = resolve_overlap(&g, &box_at(72.0, 20.0), Vec2::new(4.0, 0.0));
        assert!(c.wall_right);
        assert_eq!(c.wall_direction(), 1);
        assert!(!c.grounded);
        // The legacy resolver realigns the left edge to its cell boundary
        // rather than backing out by the exact penetration depth.
        assert_eq!(d, Vec2::new(-8.0, 0.0));
    }

    #[test]
    fn test_inside_wall_pushed_right() {
        let g = floor_and_wall();
        // Box interior overlapping the wall column, closest escape is right.
        let (c, d) = resolve_overlap(&g, &box_at(82.0, 20.0), Vec2::new(-4.0, 0.0));
        assert!(c.wall_left);
        assert_eq!(c.wall_direction(), -1);
        assert_eq!(d, Vec2::new(14.0, 0.0));
    }

    #[test]
    fn test_ceiling_penetration_pushed_down() {
        let g = TileGrid::from_ascii(
            "\
            ####\n\
            ....\n\
            ####",
            16,
        );
        let (c, d) = resolve_overlap(&g, &box_at(10.0, 14.0), Vec2::new(0.0, -3.0));
        assert!(c.ceiling);
        assert!(!c.grounded);
        assert_eq!(d, Vec2::new(0.0, 2.0));
    }

    #[test]
    fn test_single_corner_uses_velocity_sign() {
        let g = TileGrid::from_ascii(
            "\
            #...\n\
            ....\n\
            ####",
            16,
        );
        // Only the top-left corner tile is solid.
        let hb = box_at(12.0, 12.0);
        let (right, d_right) = resolve_overlap(&g, &hb, Vec2::new(2.0, 0.0));
        assert!(right.ceiling);
        assert_eq!(d_right, Vec2::new(0.0, 4.0));

        let (left, d_left) = resolve_overlap(&g, &hb, Vec2::new(-2.0, 0.0));
        assert!(left.wall_left);
        assert_eq!(d_left, Vec2::new(4.0, 0.0));
    }
}
