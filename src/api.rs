use glam::Vec2;

use crate::types::{Aabb, TileType};

/// Read-only tile provider contract the resolver is written against.
///
/// `TileGrid` is the canonical implementation; anything that can answer a
/// per-cell lookup (streamed chunks, procedural layouts) can back the
/// resolver through this trait.
pub trait TileSource {
    /// Tile edge length in pixels. Tiles are squares.
    fn tile_size(&self) -> f32;

    /// Tile at tile coordinate (x, y), or `None` outside the level.
    fn tile_at(&self, x: i32, y: i32) -> Option<TileType>;

    // --- Provided lookups --------------------------------------------------

    /// Out-of-bounds normalized to a solid wall, so level boundaries act as
    /// implicit walls. This policy is fixed; callers must not re-check
    /// bounds per call site.
    #[inline]
    fn tile_or_wall(&self, x: i32, y: i32) -> TileType {
        self.tile_at(x, y).unwrap_or(TileType::Wall)
    }

    /// True if the cell blocks movement, boundary included.
    #[inline]
    fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile_or_wall(x, y).is_collider()
    }

    /// World-space rectangle of a cell. Valid for out-of-bounds coordinates
    /// too, so boundary cells can be swept against like any wall.
    #[inline]
    fn tile_aabb(&self, x: i32, y: i32) -> Aabb {
        let ts = self.tile_size();
        Aabb::new(
            Vec2::new((x as f32 + 0.5) * ts, (y as f32 + 0.5) * ts),
            Vec2::splat(ts * 0.5),
        )
    }
}
