use glam::Vec2;
use tracing::debug;

use crate::api::TileSource;
use crate::grid::TileGrid;
use crate::types::{Aabb, TileType};

/// Everything the level-loading side hands the collision core: the tile
/// grid plus the named entity rectangles a map editor exports (spawn point,
/// exit region). Asset parsing itself lives with the host.
#[derive(Clone, Debug)]
pub struct LevelMap {
    pub grid: TileGrid,
    /// Top-left corner of the player's spawn hitbox.
    pub player_start: Vec2,
    /// Reaching this region ends the level.
    pub exit: Aabb,
}

impl LevelMap {
    pub fn new(grid: TileGrid, player_start: Vec2, exit: Aabb) -> LevelMap {
        debug!(
            width = grid.width(),
            height = grid.height(),
            ?player_start,
            "level map built"
        );
        LevelMap {
            grid,
            player_start,
            exit,
        }
    }

    /// Test/demo convenience on top of [`TileGrid::from_ascii`], with two
    /// extra markers on otherwise-empty tiles: `P` player start, `X` exit.
    pub fn from_ascii(art: &str, tile_size: i32) -> LevelMap {
        let ts = tile_size as f32;
        let mut player_start = Vec2::ZERO;
        let mut exit_min: Option<Vec2> = None;
        let mut exit_max = Vec2::ZERO;

        let mut sanitized = String::with_capacity(art.len());
        let mut y = 0i32;
        for row in art.lines().filter(|l| !l.trim().is_empty()) {
            for (x, c) in row.chars().enumerate() {
                let x = x as i32;
                match c {
                    'P' => {
                        player_start = Vec2::new(x as f32 * ts, y as f32 * ts);
                        sanitized.push('.');
                    }
                    'X' => {
                        let lo = Vec2::new(x as f32 * ts, y as f32 * ts);
                        let hi = lo + Vec2::splat(ts);
                        let min = exit_min.get_or_insert(lo);
                        *min = min.min(lo);
                        exit_max = exit_max.max(hi);
                        sanitized.push('.');
                    }
                    other => sanitized.push(other),
                }
            }
            sanitized.push('\n');
            y += 1;
        }

        let exit = match exit_min {
            Some(min) => Aabb::from_corner_size(min, exit_max - min),
            None => Aabb::default(),
        };
        LevelMap::new(TileGrid::from_ascii(&sanitized, tile_size), player_start, exit)
    }

    /// True if any tile the hitbox overlaps (edge touch included) is lava.
    /// The only place tile types matter beyond solid/empty.
    pub fn hazard_overlap(&self, hitbox: &Aabb) -> bool {
        let ts = self.grid.tile_size();
        let min = hitbox.min();
        let max = hitbox.max();
        let x0 = (min.x / ts).floor() as i32;
        let y0 = (min.y / ts).floor() as i32;
        let x1 = (max.x / ts).floor() as i32;
        let y1 = (max.y / ts).floor() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if self.grid.tile_at(x, y) == Some(TileType::Lava) {
                    return true;
                }
            }
        }
        false
    }

    /// True once the hitbox reaches the exit region.
    pub fn at_exit(&self, hitbox: &Aabb) -> bool {
        crate::narrowphase::overlaps(hitbox, &self.exit)
    }
}
