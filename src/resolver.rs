use glam::Vec2;

use crate::api::TileSource;
use crate::narrowphase::swept_toi;
use crate::types::{Aabb, Contacts, ResolverConfig};

/// 3x3 neighborhood offsets minus the center, row-major. Iteration order is
/// fixed: the TOI minimum must fold in the same order every call so a
/// resting hitbox reports bit-identical results frame to frame.
const NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Tile cell occupied by a world position. True floor: negative coordinates
/// land one cell lower, never truncate toward zero.
#[inline]
fn occupied_cell(tile_size: f32, pos: Vec2) -> (i32, i32) {
    (
        (pos.x / tile_size).floor() as i32,
        (pos.y / tile_size).floor() as i32,
    )
}

fn assert_contract<T: TileSource>(tiles: &T, hitbox: &Aabb) -> f32 {
    let ts = tiles.tile_size();
    assert!(ts > 0.0, "tile size must be positive");
    let size = hitbox.size();
    // The 3x3-neighborhood assumption is unsound for larger boxes.
    assert!(
        size.x < ts && size.y < ts,
        "hitbox must be strictly smaller than one tile"
    );
    ts
}

/// Minimum TOI of `hitbox` translated by `vel` against the solid cells of
/// the 3x3 neighborhood around `cell` (out-of-bounds cells count as solid).
fn min_toi_around<T: TileSource>(tiles: &T, hitbox: &Aabb, vel: Vec2, cell: (i32, i32)) -> f32 {
    let mut min_t = 1.0f32;
    for (dx, dy) in NEIGHBORS {
        let (nx, ny) = (cell.0 + dx, cell.1 + dy);
        if !tiles.is_solid(nx, ny) {
            continue;
        }
        let sweep = swept_toi(hitbox, vel, &tiles.tile_aabb(nx, ny));
        if sweep.hit && sweep.toi < min_t {
            min_t = sweep.toi;
        }
    }
    min_t
}

/// How far the hitbox can travel along `velocity` this frame before the
/// first blocking contact, as a fraction t in [0,1] of the full
/// displacement. The caller applies `velocity * t` itself; 1.0 means the
/// motion completes unobstructed.
///
/// The displacement is subdivided into uniform sub-steps of at most a
/// quarter tile (`cfg.substep_divisor`), re-querying the 3x3 neighborhood
/// after each partial advance, so a fast hitbox cannot tunnel through a
/// one-tile wall between two queries.
pub fn resolve_motion<T: TileSource>(
    tiles: &T,
    hitbox: &Aabb,
    velocity: Vec2,
    cfg: &ResolverConfig,
) -> f32 {
    let ts = assert_contract(tiles, hitbox);
    assert!(cfg.substep_divisor > 0.0, "sub-step divisor must be positive");

    let speed = velocity.length();
    if speed == 0.0 {
        return 1.0;
    }

    let step_speed = ts / cfg.substep_divisor;
    let num_steps = (speed / step_speed).floor() as u32 + 1;
    // Uniform sub-steps, each at most step_speed, summing exactly to the
    // requested displacement.
    let step_vel = velocity / num_steps as f32;

    let mut hb = *hitbox;
    for completed in 0..num_steps {
        let cell = occupied_cell(ts, hb.min());
        let t = min_toi_around(tiles, &hb, step_vel, cell);
        if t < 1.0 {
            return (completed as f32 + t) / num_steps as f32;
        }
        hb = hb.translated(step_vel);
    }
    1.0
}

/// What the hitbox is in contact with right now, independent of velocity.
///
/// Four independent 1-pixel micro-sweeps (down, up, left, right), each
/// against the 3 neighborhood cells lying in that direction; contact means
/// the sweep's TOI falls below `cfg.contact_epsilon`. A box resting flush on
/// a floor reports grounded stably, and grounded/wall/ceiling flags can all
/// hold at once.
pub fn query_contacts<T: TileSource>(tiles: &T, hitbox: &Aabb, cfg: &ResolverConfig) -> Contacts {
    let ts = assert_contract(tiles, hitbox);
    assert!(cfg.probe_length > 0.0, "probe length must be positive");
    assert!(cfg.contact_epsilon > 0.0, "contact epsilon must be positive");

    let cell = occupied_cell(ts, hitbox.min());

    let probe = |dir: Vec2, lane: [(i32, i32); 3]| -> bool {
        let vel = dir * cfg.probe_length;
        let mut min_t = 1.0f32;
        for (dx, dy) in lane {
            let (nx, ny) = (cell.0 + dx, cell.1 + dy);
            if !tiles.is_solid(nx, ny) {
                continue;
            }
            let sweep = swept_toi(hitbox, vel, &tiles.tile_aabb(nx, ny));
            if sweep.hit && sweep.toi < min_t {
                min_t = sweep.toi;
            }
        }
        min_t < cfg.contact_epsilon
    };

    // Left before right: the signed wall direction lets right overwrite.
    Contacts {
        grounded: probe(Vec2::new(0.0, 1.0), [(-1, 1), (0, 1), (1, 1)]),
        ceiling: probe(Vec2::new(0.0, -1.0), [(-1, -1), (0, -1), (1, -1)]),
        wall_left: probe(Vec2::new(-1.0, 0.0), [(-1, -1), (-1, 0), (-1, 1)]),
        wall_right: probe(Vec2::new(1.0, 0.0), [(1, -1), (1, 0), (1, 1)]),
    }
}
