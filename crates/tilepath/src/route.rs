//! Query and result types, and walking a finished search back into tiles.

use tilepath_core::{MoveSignature, Point, tile_center};

use crate::context::PathfindContext;
use crate::error::PathError;

/// A route request. Coordinates are in world units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathJob {
    pub origin: Point,
    pub destination: Point,
    pub signature: MoveSignature,
    /// Tick the request is made in.
    pub game_time: u32,
}

/// How well a [`Route`] satisfies its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteStatus {
    /// The route ends at the requested destination.
    Exact,
    /// The destination is unreachable; the route ends at the closest
    /// reachable tile instead.
    Nearest,
}

/// A planned route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub status: RouteStatus,
    /// World-space waypoints, origin side first. Never empty, never
    /// includes the centre of the origin tile.
    pub waypoints: Vec<Point>,
    /// Where the route actually ends; equal to the last waypoint.
    pub destination: Point,
}

impl Route {
    /// Whether the route reaches the requested destination.
    pub fn is_exact(&self) -> bool {
        self.status == RouteStatus::Exact
    }
}

/// Append tile centres from `end` back toward the context anchor.
///
/// The anchor itself is not appended. Tracing also stops at a tile that
/// points to itself, which is the seed of a search restarted from the
/// nearest reachable tile.
pub(crate) fn trace_back(
    ctx: &PathfindContext,
    end: Point,
    tile_units: i32,
    out: &mut Vec<Point>,
) -> Result<(), PathError> {
    let limit = ctx.blocking.range().len();
    let mut p = end;
    while p != ctx.tile_s {
        let Some(tile) = ctx.explored(p) else {
            return Err(PathError::CorruptRoute { tile: p });
        };
        if out.len() >= limit {
            return Err(PathError::CorruptRoute { tile: p });
        }
        out.push(tile_center(p, tile_units));

        let prev = tile.previous(p);
        if prev == p {
            break;
        }
        p = prev;
    }
    Ok(())
}
