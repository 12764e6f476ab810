//! A* over a [`PathfindContext`].
//!
//! The search is resumable: the frontier and explored grid stay in the
//! context after a target is reached, so a later query can re-estimate the
//! frontier toward a different target and keep expanding.

use std::collections::BinaryHeap;
use std::rc::Rc;

use tilepath_core::Point;

use crate::blocking::BlockingMap;
use crate::context::{Anchor, PathfindContext};
use crate::distance::estimate;
use crate::node::PathNode;

/// Neighbour offsets. Even entries are orthogonal, odd entries diagonal,
/// so the two tiles flanking diagonal `d` are `d + 1` and `d + 7` (mod 8).
const DIR_OFFSETS: [(i32, i32); 8] = [
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl PathfindContext {
    /// Assign the context to `tile_s` and seed the frontier with
    /// `tile_real_s`, estimating toward `tile_f`.
    ///
    /// `tile_real_s` differs from `tile_s` when the destination is
    /// unreachable and the search restarts from the nearest reachable tile.
    pub(crate) fn init(
        &mut self,
        blocking: Rc<BlockingMap>,
        tile_s: Point,
        tile_real_s: Point,
        tile_f: Point,
        anchor: Anchor,
    ) {
        self.assign(blocking, tile_s, anchor);
        self.new_node(tile_f, tile_real_s, 0, tile_real_s);
        debug_assert!(!self.nodes.is_empty(), "seed node for {tile_real_s} was not added");
    }

    /// Offer `pos`, reached from `prev_pos`, to the frontier.
    fn new_node(&mut self, dest: Point, pos: Point, prev_dist: u32, prev_pos: Point) {
        // Callers only offer unblocked tiles, and off-map tiles are blocked.
        let Some(i) = self.idx(pos) else {
            return;
        };
        let dist = prev_dist + estimate(prev_pos, pos);
        let node = PathNode {
            pos,
            dist,
            est: dist + estimate(pos, dest),
        };

        let iteration = self.iteration;
        let expl = &mut self.map[i];
        if expl.iteration == iteration && (expl.visited || expl.dist <= dist) {
            return;
        }

        expl.iteration = iteration;
        expl.dx = (pos.x - prev_pos.x) as i8;
        expl.dy = (pos.y - prev_pos.y) as i8;
        expl.dist = dist;
        expl.visited = false;

        // Any older entry for this tile stays in the heap and is skipped
        // when popped, since the tile will be visited by then.
        self.nodes.push(node);
    }

    /// Recompute every frontier estimate toward `tile_f` and restore the
    /// heap order. Distances are unchanged.
    pub(crate) fn reestimate(&mut self, tile_f: Point) {
        let mut nodes = std::mem::take(&mut self.nodes).into_vec();
        for node in nodes.iter_mut() {
            node.est = node.dist + estimate(node.pos, tile_f);
        }
        self.nodes = BinaryHeap::from(nodes);
    }

    /// Expand the frontier until `tile_f` is visited or the frontier runs
    /// dry.
    ///
    /// Returns `tile_f` if it was reached, otherwise the visited tile with
    /// the smallest remaining estimate to it. `None` means nothing was
    /// expanded at all.
    pub(crate) fn explore(&mut self, tile_f: Point) -> Option<Point> {
        let mut nearest = None;
        let mut nearest_dist = u32::MAX;

        while let Some(node) = self.nodes.pop() {
            let Some(i) = self.idx(node.pos) else {
                continue;
            };
            if self.map[i].visited {
                continue;
            }
            self.map[i].visited = true;

            let remaining = node.est - node.dist;
            if remaining < nearest_dist {
                nearest = Some(node.pos);
                nearest_dist = remaining;
            }

            for (dir, &(dx, dy)) in DIR_OFFSETS.iter().enumerate() {
                if dir % 2 != 0 {
                    // No cutting corners past a blocked tile.
                    let (ax, ay) = DIR_OFFSETS[(dir + 1) % 8];
                    let (bx, by) = DIR_OFFSETS[(dir + 7) % 8];
                    if self.is_blocked(node.pos.shift(ax, ay))
                        || self.is_blocked(node.pos.shift(bx, by))
                    {
                        continue;
                    }
                }

                let next = node.pos.shift(dx, dy);
                if self.is_blocked(next) {
                    continue;
                }
                self.new_node(tile_f, next, node.dist, node.pos);
            }

            // Stop only once the target's neighbours are on the frontier, so
            // a resumed search can still route through it.
            if node.pos == tile_f {
                nearest = Some(node.pos);
                break;
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepath_core::{MoveSignature, MoveType, Propulsion, Range};

    fn blocking(w: i32, h: i32, walls: &[(i32, i32)]) -> Rc<BlockingMap> {
        let walls: Vec<Point> = walls.iter().map(|&(x, y)| Point::new(x, y)).collect();
        let src = move |p: Point, _: MoveSignature| walls.contains(&p);
        let sig = MoveSignature::new(Propulsion::Wheeled, 0, MoveType::Move);
        Rc::new(BlockingMap::build(&src, Range::with_size(w, h), sig, 1))
    }

    fn fresh(map: &Rc<BlockingMap>, from: Point, to: Point) -> PathfindContext {
        let mut ctx = PathfindContext::new(Rc::clone(map));
        ctx.init(Rc::clone(map), from, from, to, Anchor::Origin);
        ctx
    }

    #[test]
    fn diagonal_offsets_are_odd() {
        for (dir, (dx, dy)) in DIR_OFFSETS.iter().enumerate() {
            assert_eq!(dir % 2 != 0, *dx != 0 && *dy != 0);
            let (ax, ay) = DIR_OFFSETS[(dir + 1) % 8];
            let (bx, by) = DIR_OFFSETS[(dir + 7) % 8];
            if dir % 2 != 0 {
                assert_eq!((ax + bx, ay + by), (*dx, *dy));
            }
        }
    }

    #[test]
    fn reaches_target_with_optimal_distance() {
        let map = blocking(10, 10, &[]);
        let to = Point::new(9, 6);
        let mut ctx = fresh(&map, Point::new(0, 0), to);
        assert_eq!(ctx.explore(to), Some(to));
        let t = ctx.explored(to).unwrap();
        assert!(t.visited);
        assert_eq!(t.dist, 6 * 99 + 3 * 70);
    }

    #[test]
    fn unreachable_target_yields_nearest_visited_tile() {
        // Wall across x = 3 cuts the map in two.
        let walls: Vec<(i32, i32)> = (0..5).map(|y| (3, y)).collect();
        let map = blocking(6, 5, &walls);
        let to = Point::new(5, 2);
        let mut ctx = fresh(&map, Point::new(0, 0), to);
        assert_eq!(ctx.explore(to), Some(Point::new(2, 2)));
        assert!(ctx.nodes.is_empty());
        assert!(!ctx.is_visited(to));
    }

    #[test]
    fn corners_are_not_cut() {
        // . #
        // # .
        let map = blocking(2, 2, &[(1, 0), (0, 1)]);
        let to = Point::new(1, 1);
        let mut ctx = fresh(&map, Point::new(0, 0), to);
        assert_eq!(ctx.explore(to), Some(Point::new(0, 0)));
        assert!(ctx.explored(to).is_none());
    }

    #[test]
    fn one_blocked_flank_is_enough_to_stop_a_diagonal() {
        let map = blocking(3, 3, &[(1, 0)]);
        let mut ctx = fresh(&map, Point::new(0, 0), Point::new(2, 2));
        ctx.explore(Point::new(2, 2));
        // (1, 1) must be entered straight from (0, 1), never diagonally.
        let t = ctx.explored(Point::new(1, 1)).unwrap();
        assert_eq!((t.dx, t.dy), (1, 0));
        assert_eq!(t.dist, 140);
    }

    #[test]
    fn explore_can_resume_toward_a_new_target() {
        let map = blocking(12, 12, &[]);
        let mut ctx = fresh(&map, Point::new(0, 0), Point::new(3, 0));
        assert_eq!(ctx.explore(Point::new(3, 0)), Some(Point::new(3, 0)));
        assert!(!ctx.nodes.is_empty());

        let far = Point::new(11, 11);
        ctx.reestimate(far);
        assert_eq!(ctx.explore(far), Some(far));
        assert_eq!(ctx.explored(far).map(|t| t.dist), Some(11 * 99));
    }

    #[test]
    fn resumed_search_passes_through_old_target() {
        // . . . . .
        // . # # # .
        // . . . . .
        let map = blocking(5, 3, &[(1, 1), (2, 1), (3, 1)]);
        let first = Point::new(2, 0);
        let mut ctx = fresh(&map, Point::new(0, 0), first);
        assert_eq!(ctx.explore(first), Some(first));

        let second = Point::new(4, 0);
        ctx.reestimate(second);
        assert_eq!(ctx.explore(second), Some(second));
        let t = ctx.explored(second).unwrap();
        assert_eq!(t.dist, 4 * 70);
        assert_eq!(t.previous(second), Point::new(3, 0));
    }

    #[test]
    fn reestimate_reorders_frontier() {
        let map = blocking(10, 10, &[]);
        let mut ctx = fresh(&map, Point::new(5, 5), Point::new(9, 5));
        ctx.explore(Point::new(6, 5));
        ctx.reestimate(Point::new(0, 5));
        let best = ctx.nodes.peek().copied().unwrap();
        assert!(ctx.nodes.iter().all(|n| n.est >= best.est));
        assert_eq!(best.est, best.dist + estimate(best.pos, Point::new(0, 5)));
        assert!(best.pos.x < 5);
    }

    #[test]
    fn empty_frontier_explores_nothing() {
        let map = blocking(4, 4, &[]);
        let mut ctx = fresh(&map, Point::new(0, 0), Point::new(3, 3));
        ctx.explore(Point::new(9, 9));
        assert!(ctx.nodes.is_empty());
        assert_eq!(ctx.explore(Point::new(3, 3)), None);
    }

    #[test]
    fn back_pointers_lead_to_anchor() {
        let map = blocking(8, 8, &[(3, 3), (3, 4), (4, 3)]);
        let from = Point::new(1, 1);
        let to = Point::new(6, 6);
        let mut ctx = fresh(&map, from, to);
        ctx.explore(to);
        let mut p = to;
        let mut steps = 0;
        while p != from {
            let t = ctx.explored(p).unwrap();
            assert!(t.visited);
            let prev = t.previous(p);
            assert!(prev.is_adjacent(p));
            assert!(!map.is_blocked(p));
            p = prev;
            steps += 1;
            assert!(steps < 64);
        }
    }
}
