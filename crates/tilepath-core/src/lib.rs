//! **tilepath-core**: shared types for the tilepath planner.
//!
//! Geometry primitives, the world/tile coordinate transform, and the
//! movement signature that decides which tiles a unit may enter.

pub mod geom;
pub mod movement;

pub use geom::{Point, Range, TILE_SHIFT, TILE_UNITS, map_coord, tile_center, world_coord};
pub use movement::{MoveSignature, MoveType, Propulsion, PropulsionClass};
