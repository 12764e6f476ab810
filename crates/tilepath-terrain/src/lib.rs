//! Terrain maps for the tilepath planner.
//!
//! A [`TerrainMap`] is parsed from ASCII art or generated with
//! [`MapGen`], and implements [`tilepath::BlockingSource`] so it can be
//! handed straight to [`tilepath::PathPlanner::find_route`].

pub mod mapgen;
pub mod terrain;

pub use mapgen::{LakeRule, MapGen};
pub use terrain::{Terrain, TerrainError, TerrainMap};
