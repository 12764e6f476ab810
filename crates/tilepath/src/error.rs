use std::fmt;

use tilepath_core::{MoveSignature, Point};

/// Which end of a [`PathJob`](crate::PathJob) an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Origin => f.write_str("origin"),
            Endpoint::Destination => f.write_str("destination"),
        }
    }
}

/// Errors that can occur when planning a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// An endpoint lies outside the map.
    OutOfBounds { which: Endpoint, tile: Point },
    /// The movement signature names a player that does not exist.
    InvalidSignature(MoveSignature),
    /// A [`PlannerConfig`](crate::PlannerConfig) value is unusable.
    InvalidConfig(&'static str),
    /// The waypoint buffer could not be allocated. Caches were reset.
    OutOfMemory,
    /// Following the explored tiles back to the anchor did not terminate.
    /// Caches were reset.
    CorruptRoute { tile: Point },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { which, tile } => write!(f, "{which} tile {tile} is off the map"),
            Self::InvalidSignature(sig) => write!(f, "invalid movement signature: {sig}"),
            Self::InvalidConfig(why) => write!(f, "invalid planner config: {why}"),
            Self::OutOfMemory => f.write_str("out of memory for route waypoints"),
            Self::CorruptRoute { tile } => {
                write!(f, "route extraction looped or left the map at {tile}")
            }
        }
    }
}

impl std::error::Error for PathError {}
