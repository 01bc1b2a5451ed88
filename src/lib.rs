//! tilestep: tile-grid collision core for a 2D platformer (swept sub-stepped
//! motion resolution, contact queries, and a fixed-step character controller;
//! no rendering, no I/O)

pub mod types;
pub mod api;
pub mod grid;
pub mod narrowphase;
pub mod resolver;
pub mod corner;
pub mod level;
pub mod controller;

pub use crate::api::TileSource;
pub use crate::grid::TileGrid;
pub use crate::level::LevelMap;
pub use crate::resolver::{query_contacts, resolve_motion};
pub use crate::types::*;
