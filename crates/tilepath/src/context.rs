//! Reusable search state.

use std::collections::BinaryHeap;
use std::rc::Rc;

use tilepath_core::Point;

use crate::blocking::BlockingMap;
use crate::node::{ExploredTile, PathNode, STALE_ITERATION};

/// Which endpoint of the query a context grows outward from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Anchor {
    /// Fresh search from the origin toward the destination.
    Origin,
    /// Re-primed search from the destination side, reusable by any unit
    /// heading to the same destination.
    Destination,
}

/// One A* search: the frontier, the explored-tile grid with its way back to
/// the anchor, and the task it was built for.
///
/// Assigning a new task bumps `iteration` instead of clearing the grid; a
/// tile's record only counts while its tag matches.
pub(crate) struct PathfindContext {
    /// Tile the explored region leads back to.
    pub(crate) tile_s: Point,
    pub(crate) anchor: Anchor,
    pub(crate) game_time: u32,
    /// Nearest reachable tile to the destination found by the fresh search.
    pub(crate) nearest: Point,
    pub(crate) iteration: u16,
    pub(crate) nodes: BinaryHeap<PathNode>,
    pub(crate) map: Vec<ExploredTile>,
    pub(crate) blocking: Rc<BlockingMap>,
}

impl PathfindContext {
    /// An empty context. Call [`assign`](Self::assign) (usually through
    /// `init`) before searching.
    pub(crate) fn new(blocking: Rc<BlockingMap>) -> Self {
        Self {
            tile_s: Point::ZERO,
            anchor: Anchor::Origin,
            game_time: blocking.game_time(),
            nearest: Point::ZERO,
            iteration: 0,
            nodes: BinaryHeap::new(),
            map: Vec::new(),
            blocking,
        }
    }

    /// Whether this context can answer a query toward `tile_s` with the given
    /// blocking map during tick `game_time`.
    pub(crate) fn matches(&self, blocking: &Rc<BlockingMap>, tile_s: Point, game_time: u32) -> bool {
        self.anchor == Anchor::Destination
            && self.game_time == game_time
            && Rc::ptr_eq(&self.blocking, blocking)
            && self.tile_s == tile_s
    }

    /// Retarget the context: new blocking map and anchor, empty frontier,
    /// every explored tile invalidated.
    pub(crate) fn assign(&mut self, blocking: Rc<BlockingMap>, tile_s: Point, anchor: Anchor) {
        self.game_time = blocking.game_time();
        self.blocking = blocking;
        self.tile_s = tile_s;
        self.anchor = anchor;
        self.nodes.clear();

        self.iteration = self.iteration.wrapping_add(1);
        if self.iteration == STALE_ITERATION {
            // Every tag may be in use now, so wipe the grid once.
            self.map.clear();
            self.iteration = 0;
        }
        self.map.resize(self.blocking.range().len(), ExploredTile::default());
    }

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.blocking.range().index(p)
    }

    #[inline]
    pub(crate) fn is_blocked(&self, p: Point) -> bool {
        self.blocking.is_blocked(p)
    }

    /// The record for `p`, if it belongs to the current iteration.
    #[inline]
    pub(crate) fn explored(&self, p: Point) -> Option<&ExploredTile> {
        let tile = &self.map[self.idx(p)?];
        (tile.iteration == self.iteration).then_some(tile)
    }

    /// Whether the shortest way from `p` to the anchor is already known.
    #[inline]
    pub(crate) fn is_visited(&self, p: Point) -> bool {
        self.explored(p).is_some_and(|t| t.visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepath_core::{MoveSignature, MoveType, Propulsion, Range};

    fn open_map(game_time: u32) -> Rc<BlockingMap> {
        let open = |_: Point, _: MoveSignature| false;
        let sig = MoveSignature::new(Propulsion::Wheeled, 0, MoveType::Move);
        Rc::new(BlockingMap::build(&open, Range::with_size(4, 4), sig, game_time))
    }

    #[test]
    fn assign_invalidates_previous_tiles() {
        let map = open_map(1);
        let mut ctx = PathfindContext::new(Rc::clone(&map));
        ctx.assign(Rc::clone(&map), Point::new(0, 0), Anchor::Origin);
        let i = ctx.idx(Point::new(1, 1)).unwrap();
        ctx.map[i] = ExploredTile {
            iteration: ctx.iteration,
            visited: true,
            ..ExploredTile::default()
        };
        assert!(ctx.is_visited(Point::new(1, 1)));

        ctx.assign(map, Point::new(0, 0), Anchor::Origin);
        assert!(!ctx.is_visited(Point::new(1, 1)));
        assert!(ctx.explored(Point::new(1, 1)).is_none());
    }

    #[test]
    fn iteration_wrap_clears_grid() {
        let map = open_map(1);
        let mut ctx = PathfindContext::new(Rc::clone(&map));
        ctx.assign(Rc::clone(&map), Point::new(0, 0), Anchor::Origin);
        ctx.iteration = STALE_ITERATION - 2;
        ctx.assign(Rc::clone(&map), Point::new(0, 0), Anchor::Origin);
        let i = ctx.idx(Point::new(2, 3)).unwrap();
        ctx.map[i].iteration = ctx.iteration;
        ctx.map[i].visited = true;

        // Next bump would hit the stale tag: wipe and restart at 0.
        ctx.assign(map, Point::new(0, 0), Anchor::Origin);
        assert_eq!(ctx.iteration, 0);
        assert_eq!(ctx.map.len(), 16);
        assert!(ctx.map.iter().all(|t| t.iteration == STALE_ITERATION));
    }

    #[test]
    fn matches_requires_same_tick_map_and_destination_anchor() {
        let map = open_map(5);
        let other = open_map(5);
        let dest = Point::new(3, 3);
        let mut ctx = PathfindContext::new(Rc::clone(&map));

        ctx.assign(Rc::clone(&map), dest, Anchor::Origin);
        assert!(!ctx.matches(&map, dest, 5));

        ctx.assign(Rc::clone(&map), dest, Anchor::Destination);
        assert!(ctx.matches(&map, dest, 5));
        assert!(!ctx.matches(&map, Point::new(3, 2), 5));
        assert!(!ctx.matches(&other, dest, 5));
        assert!(!ctx.matches(&map, dest, 6));
    }

    #[test]
    fn off_map_is_never_explored() {
        let map = open_map(0);
        let mut ctx = PathfindContext::new(Rc::clone(&map));
        ctx.assign(map, Point::ZERO, Anchor::Origin);
        assert!(ctx.explored(Point::new(4, 0)).is_none());
        assert!(ctx.is_blocked(Point::new(4, 0)));
    }
}
