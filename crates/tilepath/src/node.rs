use std::cmp::Ordering;

use tilepath_core::Point;

// ---------------------------------------------------------------------------
// Frontier node
// ---------------------------------------------------------------------------

/// A frontier entry: a tile, its distance from the search anchor, and the
/// estimated total cost through it to the current target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PathNode {
    pub(crate) pos: Point,
    pub(crate) dist: u32,
    pub(crate) est: u32,
}

impl Ord for PathNode {
    /// `BinaryHeap` pops the greatest node, so "greater" means "expand
    /// first": lowest `est`, then highest `dist` (closest to the target),
    /// then position for determinism.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .est
            .cmp(&self.est)
            .then(self.dist.cmp(&other.dist))
            .then(self.pos.cmp(&other.pos))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// Explored tile
// ---------------------------------------------------------------------------

/// Iteration tag that no live context ever uses.
pub(crate) const STALE_ITERATION: u16 = u16::MAX;

/// Per-tile search record inside a context.
///
/// Only meaningful while `iteration` equals the owning context's iteration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ExploredTile {
    pub(crate) iteration: u16,
    /// Step taken to arrive here; subtracting it leads back to the anchor.
    pub(crate) dx: i8,
    pub(crate) dy: i8,
    /// Shortest known distance from the anchor.
    pub(crate) dist: u32,
    /// Popped from the frontier, `dist` is final.
    pub(crate) visited: bool,
}

impl Default for ExploredTile {
    fn default() -> Self {
        Self {
            iteration: STALE_ITERATION,
            dx: 0,
            dy: 0,
            dist: 0,
            visited: false,
        }
    }
}

impl ExploredTile {
    /// The neighbour this tile was reached from.
    #[inline]
    pub(crate) fn previous(&self, p: Point) -> Point {
        p.shift(-i32::from(self.dx), -i32::from(self.dy))
    }
}
