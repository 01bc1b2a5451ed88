use glam::Vec2;

use crate::api::TileSource;
use crate::types::TileType;

/// Immutable-per-level tile grid. Row-major, top-left tile first; built once
/// when a level loads and read-only afterwards, so shared references are safe
/// to hand to any number of callers.
#[derive(Clone, Debug)]
pub struct TileGrid {
    tile_size: i32,
    width: i32,
    height: i32,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// `width`/`height` in tiles. Panics on non-positive dimensions or a
    /// mismatched tile count; those are caller bugs, not data errors.
    pub fn new(tile_size: i32, width: i32, height: i32, tiles: Vec<TileType>) -> TileGrid {
        assert!(tile_size > 0, "tile size must be positive");
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        assert_eq!(
            tiles.len(),
            (width * height) as usize,
            "tile count must match grid dimensions"
        );
        TileGrid {
            tile_size,
            width,
            height,
            tiles,
        }
    }

    /// Build from a raw editor export: level dimensions in pixels plus the
    /// int grid, top-left first. Pixel dimensions must be exact multiples of
    /// the tile size (asserted); malformed grid *data* is reported as an
    /// error instead, since it comes from a file a level editor wrote.
    pub fn from_codes(
        tile_size: i32,
        level_width: i32,
        level_height: i32,
        codes: &[i8],
    ) -> Result<TileGrid, String> {
        assert!(tile_size > 0, "tile size must be positive");
        assert!(
            level_width % tile_size == 0 && level_height % tile_size == 0,
            "level pixel dimensions must be exact multiples of the tile size"
        );
        let width = level_width / tile_size;
        let height = level_height / tile_size;
        if width <= 0 || height <= 0 {
            return Err(format!(
                "level dimensions must be positive, got {level_width}x{level_height}"
            ));
        }
        if codes.len() != (width * height) as usize {
            return Err(format!(
                "int grid holds {} cells, expected {}",
                codes.len(),
                width * height
            ));
        }
        let tiles = codes
            .iter()
            .map(|&c| TileType::from_code(c).ok_or_else(|| format!("unknown tile code {c}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TileGrid::new(tile_size, width, height, tiles))
    }

    /// Test/demo convenience: one character per tile, one line per row.
    /// `#` wall, `~` lava, `!` invisible wall, `.` or space empty.
    pub fn from_ascii(art: &str, tile_size: i32) -> TileGrid {
        let rows: Vec<&str> = art.lines().filter(|l| !l.trim().is_empty()).collect();
        assert!(!rows.is_empty(), "ascii grid must have at least one row");
        let width = rows[0].chars().count() as i32;
        let mut tiles = Vec::with_capacity(rows.len() * width as usize);
        for row in &rows {
            assert_eq!(
                row.chars().count() as i32,
                width,
                "ascii grid rows must all have the same width"
            );
            for c in row.chars() {
                tiles.push(match c {
                    '.' | ' ' => TileType::Empty,
                    '#' => TileType::Wall,
                    '~' => TileType::Lava,
                    '!' => TileType::InvisibleWall,
                    other => panic!("unrecognized tile character {other:?}"),
                });
            }
        }
        TileGrid::new(tile_size, width, rows.len() as i32, tiles)
    }

    /// Width in tiles.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Level width in pixels.
    #[inline]
    pub fn level_width(&self) -> i32 {
        self.width * self.tile_size
    }

    /// Level height in pixels.
    #[inline]
    pub fn level_height(&self) -> i32 {
        self.height * self.tile_size
    }

    /// Floor a world position to a tile coordinate. Returns `None` for
    /// negative world coordinates instead of flooring into negative tile
    /// indices (supplementary boundary guard; `tile_at` rejects negative
    /// indices on its own as well).
    pub fn world_to_tile(&self, world: Vec2) -> Option<(i32, i32)> {
        if world.x < 0.0 || world.y < 0.0 {
            return None;
        }
        let ts = self.tile_size as f32;
        Some(((world.x / ts).floor() as i32, (world.y / ts).floor() as i32))
    }

    /// Tile under a world position, or `None` outside the level.
    pub fn tile_at_world(&self, world: Vec2) -> Option<TileType> {
        let (x, y) = self.world_to_tile(world)?;
        self.tile_at(x, y)
    }
}

impl TileSource for TileGrid {
    #[inline]
    fn tile_size(&self) -> f32 {
        self.tile_size as f32
    }

    fn tile_at(&self, x: i32, y: i32) -> Option<TileType> {
        if x < 0 || y < 0 {
            return None;
        }
        if x * self.tile_size >= self.level_width() || y * self.tile_size >= self.level_height() {
            return None;
        }
        Some(self.tiles[(y * self.width + x) as usize])
    }
}
