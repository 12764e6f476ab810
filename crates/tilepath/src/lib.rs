//! Incremental A* route planning for many units on one tile map.
//!
//! [`PathPlanner`] answers point-to-point route queries cheaply by reusing
//! search state:
//!
//! - **Blocking maps**: one occupancy bitmap per tick for each group of
//!   equivalent movement signatures ([`BlockingMap`]).
//! - **Search contexts**: up to [`PlannerConfig::context_capacity`] cached
//!   A* searches in most-recently-used order. A unit heading to a
//!   destination another unit already routed to this tick resumes that
//!   search instead of starting over.
//! - **Routes**: world-space waypoints with the exact requested
//!   destination as the last point ([`Route`]), or the nearest reachable
//!   tile when the destination cannot be reached.
//!
//! Movement costs 70 per orthogonal step and 99 per diagonal step
//! ([`estimate`]). Diagonal steps never cut past a blocked tile.
//!
//! # Collaborator
//!
//! | Trait | Provides |
//! |---|---|
//! | [`BlockingSource`] | per-tile blocking predicate, signature equivalence |

mod astar;
mod blocking;
mod config;
mod context;
mod distance;
mod error;
mod node;
mod planner;
mod route;
mod traits;

pub use blocking::BlockingMap;
pub use config::PlannerConfig;
pub use distance::{DIAGONAL_COST, STRAIGHT_COST, estimate};
pub use error::{Endpoint, PathError};
pub use planner::{PathPlanner, PlannerStats};
pub use route::{PathJob, Route, RouteStatus};
pub use traits::BlockingSource;

pub use tilepath_core::{MoveSignature, MoveType, Point, Propulsion, Range};
