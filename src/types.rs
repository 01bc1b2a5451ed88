use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tile-type codes, matching the int grid a map editor exports.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i8)]
pub enum TileType {
    Empty = 0,
    Wall = 1,
    Lava = 2,
    /// Collides like a wall but is never drawn.
    InvisibleWall = 3,
}

impl TileType {
    /// Whether this tile blocks movement. Lava and invisible walls collide
    /// exactly like walls; the distinction is gameplay-only.
    #[inline]
    pub fn is_collider(self) -> bool {
        !matches!(self, TileType::Empty)
    }

    /// Decode a raw editor code. Unknown codes are a data error, not a tile.
    pub fn from_code(code: i8) -> Option<TileType> {
        match code {
            0 => Some(TileType::Empty),
            1 => Some(TileType::Wall),
            2 => Some(TileType::Lava),
            3 => Some(TileType::InvisibleWall),
            _ => None,
        }
    }
}

/// Centered axis-aligned box (half extents along X/Y), world units in pixels.
/// +Y points down, matching the grid's row order (row 0 is the top row).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Aabb {
        Aabb {
            center,
            half_extents,
        }
    }

    /// Build from a top-left corner and a size (the pixel-rect form hitboxes
    /// are usually authored in).
    pub fn from_corner_size(corner: Vec2, size: Vec2) -> Aabb {
        let half = size * 0.5;
        Aabb {
            center: corner + half,
            half_extents: half,
        }
    }

    /// Top-left corner.
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Bottom-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half_extents * 2.0
    }

    #[inline]
    pub fn translated(&self, delta: Vec2) -> Aabb {
        Aabb {
            center: self.center + delta,
            half_extents: self.half_extents,
        }
    }
}

/// Sweep (time-of-impact) result for the box-cast primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepResult {
    /// True if contact occurs anywhere in the unit interval, t=0 overlap
    /// included.
    pub hit: bool,
    /// Fraction in [0,1] of the displacement completed at first contact;
    /// 1.0 when `hit` is false.
    pub toi: f32,
}

impl SweepResult {
    pub const MISS: SweepResult = SweepResult {
        hit: false,
        toi: 1.0,
    };

    #[inline]
    pub fn hit_at(toi: f32) -> SweepResult {
        SweepResult { hit: true, toi }
    }
}

/// Directional contact flags for a stationary hitbox. Directions are
/// independent: a box can be grounded and touching a wall at once.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Contacts {
    pub grounded: bool,
    pub ceiling: bool,
    pub wall_left: bool,
    pub wall_right: bool,
}

impl Contacts {
    #[inline]
    pub fn touching_wall(&self) -> bool {
        self.wall_left || self.wall_right
    }

    /// -1 wall on the left, 0 none, +1 wall on the right. When both sides
    /// touch, right wins: the left probe is evaluated first and the right
    /// result overwrites it.
    #[inline]
    pub fn wall_direction(&self) -> i32 {
        if self.wall_right {
            1
        } else if self.wall_left {
            -1
        } else {
            0
        }
    }
}

/// Resolver tuning. These are empirical constants carried as configuration,
/// not derived invariants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Sub-step length divisor: each sub-step covers at most
    /// `tile_size / substep_divisor`. A full-tile step produces spurious
    /// overlaps; 4 is the stable margin.
    pub substep_divisor: f32,
    /// Length in pixels of the directional contact probes.
    pub probe_length: f32,
    /// A probe TOI below this counts as touching.
    pub contact_epsilon: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            substep_divisor: 4.0,
            probe_length: 1.0,
            contact_epsilon: 0.01,
        }
    }
}
