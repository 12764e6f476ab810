use std::collections::VecDeque;
use std::rc::Rc;

use tilepath_core::{MoveSignature, Point, Range, map_coord};

use crate::blocking::{BlockingMap, BlockingMapCache};
use crate::config::PlannerConfig;
use crate::context::{Anchor, PathfindContext};
use crate::error::{Endpoint, PathError};
use crate::route::{PathJob, Route, RouteStatus, trace_back};
use crate::traits::BlockingSource;

/// Counters describing how queries were served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerStats {
    /// Queries answered (successfully or not) after input validation.
    pub queries: u64,
    /// Blocking maps built.
    pub blocking_maps_built: u64,
    /// Contexts allocated.
    pub contexts_created: u64,
    /// Least-recently-used contexts overwritten by a fresh search.
    pub contexts_evicted: u64,
    /// Queries whose route was already fully explored.
    pub fast_path_hits: u64,
    /// Queries answered by resuming a cached search. A resumed search that
    /// cannot reach the origin is counted as a fresh search instead.
    pub continued_searches: u64,
    /// Queries that needed a new search from the origin.
    pub fresh_searches: u64,
}

/// Incremental route planner for many units sharing one map.
///
/// `PathPlanner` owns the per-tick blocking maps and a most-recently-used
/// list of search contexts. Units heading for the same destination in the
/// same tick share one context: the first query searches from its origin,
/// then the context is re-primed from the destination side so that later
/// queries only extend that search until their own origin is reached.
///
/// # Lifecycle
///
/// - [`begin_tick`](Self::begin_tick) once per simulation step (also done
///   implicitly by [`find_route`](Self::find_route) when a job carries a new
///   tick). Maps from the previous tick are kept one more tick.
/// - [`reset`](Self::reset) drops every context and blocking map.
/// - [`set_size`](Self::set_size) on map reload.
pub struct PathPlanner {
    rng: Range,
    config: PlannerConfig,
    blocking: BlockingMapCache,
    /// Front is most recently used.
    contexts: VecDeque<PathfindContext>,
    /// Scratch buffer for traced tiles.
    path: Vec<Point>,
    stats: PlannerStats,
}

impl PathPlanner {
    /// Create a planner for a `width` × `height` tile map with the default
    /// configuration.
    pub fn new(width: i32, height: i32) -> Self {
        Self::build(width, height, PlannerConfig::default())
    }

    /// Create a planner with a custom configuration.
    pub fn with_config(width: i32, height: i32, config: PlannerConfig) -> Result<Self, PathError> {
        config.validate()?;
        Ok(Self::build(width, height, config))
    }

    fn build(width: i32, height: i32, config: PlannerConfig) -> Self {
        Self {
            rng: Range::with_size(width, height),
            config,
            blocking: BlockingMapCache::default(),
            contexts: VecDeque::with_capacity(config.context_capacity),
            path: Vec::new(),
            stats: PlannerStats::default(),
        }
    }

    /// The tile bounds of the map.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn stats(&self) -> PlannerStats {
        self.stats
    }

    /// Number of cached search contexts.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Tick of the current blocking-map generation.
    pub fn game_time(&self) -> u32 {
        self.blocking.game_time()
    }

    /// Start tick `game_time`: the current blocking maps become the
    /// previous generation and the previous generation is dropped.
    /// Contexts built against older ticks stop matching.
    ///
    /// Does nothing if `game_time` is already the current tick.
    pub fn begin_tick(&mut self, game_time: u32) {
        if self.blocking.begin_tick(game_time) {
            log::debug!("pathfinding tick {game_time}");
        }
    }

    /// Drop every context and every blocking map.
    pub fn reset(&mut self) {
        log::debug!(
            "hard reset: dropping {} contexts and all blocking maps",
            self.contexts.len()
        );
        self.contexts.clear();
        self.blocking.clear();
        self.path.clear();
        self.stats = PlannerStats::default();
    }

    /// Switch to a new map size. Implies [`reset`](Self::reset).
    pub fn set_size(&mut self, width: i32, height: i32) {
        self.reset();
        self.rng = Range::with_size(width, height);
    }

    /// This tick's blocking map for `signature`, built on first use.
    pub fn blocking_map<B: BlockingSource + ?Sized>(
        &mut self,
        source: &B,
        signature: MoveSignature,
    ) -> Rc<BlockingMap> {
        let (map, built) = self.blocking.get(source, self.rng, signature);
        if built {
            self.stats.blocking_maps_built += 1;
        }
        map
    }

    /// Plan a route for `job` over the map described by `source`.
    ///
    /// Unreachable destinations are not an error: the route then ends at
    /// the nearest reachable tile with [`RouteStatus::Nearest`].
    pub fn find_route<B: BlockingSource + ?Sized>(
        &mut self,
        source: &B,
        job: &PathJob,
    ) -> Result<Route, PathError> {
        let units = self.config.tile_units;
        let tile_orig = map_coord(job.origin, units);
        let tile_dest = map_coord(job.destination, units);
        if !self.rng.contains(tile_orig) {
            log::warn!("rejecting path job: origin tile {tile_orig} is off the map");
            return Err(PathError::OutOfBounds {
                which: Endpoint::Origin,
                tile: tile_orig,
            });
        }
        if !self.rng.contains(tile_dest) {
            log::warn!("rejecting path job: destination tile {tile_dest} is off the map");
            return Err(PathError::OutOfBounds {
                which: Endpoint::Destination,
                tile: tile_dest,
            });
        }
        if job.signature.owner >= self.config.max_players {
            log::warn!("rejecting path job: bad signature {}", job.signature);
            return Err(PathError::InvalidSignature(job.signature));
        }

        self.begin_tick(job.game_time);
        let blocking = self.blocking_map(source, job.signature);
        let game_time = self.blocking.game_time();
        self.stats.queries += 1;

        // Look for a context already searching from this destination.
        let mut found = None;
        for (i, ctx) in self.contexts.iter_mut().enumerate() {
            if !ctx.matches(&blocking, tile_dest, game_time) {
                continue;
            }

            if ctx.is_visited(tile_orig) {
                log::trace!("route {tile_orig} -> {tile_dest} already known");
                self.stats.fast_path_hits += 1;
                found = Some(i);
                break;
            }

            log::trace!("continuing search toward {tile_orig} from {tile_dest}");
            ctx.reestimate(tile_orig);
            if ctx.explore(tile_orig) == Some(tile_orig) {
                self.stats.continued_searches += 1;
                found = Some(i);
                break;
            }
            // Origin is on another island than the one this context covers.
        }

        let (index, end, must_reverse) = match found {
            Some(i) => (i, tile_orig, false),
            None => {
                // Search from the origin, since the destination may not be
                // reachable at all.
                self.stats.fresh_searches += 1;
                if self.contexts.len() < self.config.context_capacity {
                    self.contexts.push_back(PathfindContext::new(Rc::clone(&blocking)));
                    self.stats.contexts_created += 1;
                } else {
                    self.stats.contexts_evicted += 1;
                    if let Some(old) = self.contexts.back() {
                        log::debug!(
                            "evicting least recently used context for {} ({})",
                            old.tile_s,
                            old.blocking.signature()
                        );
                    }
                }
                let i = self.contexts.len() - 1;
                let ctx = &mut self.contexts[i];
                ctx.init(Rc::clone(&blocking), tile_orig, tile_orig, tile_dest, Anchor::Origin);
                let end = ctx.explore(tile_dest).unwrap_or(tile_orig);
                ctx.nearest = end;
                (i, end, true)
            }
        };

        let status = if self.contexts[index].nearest == tile_dest {
            RouteStatus::Exact
        } else {
            RouteStatus::Nearest
        };

        let mut tiles = std::mem::take(&mut self.path);
        tiles.clear();
        let traced = trace_back(&self.contexts[index], end, units, &mut tiles);
        debug_assert!(traced.is_ok(), "explored tiles are corrupt: {traced:?}");
        if let Err(err) = traced {
            log::error!("{err} while routing {tile_orig} -> {tile_dest}; resetting caches");
            self.reset();
            return Err(err);
        }

        // Origin side first, without the origin tile itself.
        if must_reverse {
            tiles.reverse();
        } else if !tiles.is_empty() {
            tiles.remove(0);
        }
        match status {
            RouteStatus::Exact => {
                // Exact coordinates instead of the destination tile centre.
                if must_reverse {
                    tiles.pop();
                }
                tiles.push(job.destination);
            }
            RouteStatus::Nearest => {
                if tiles.is_empty() {
                    tiles.push(job.origin);
                }
            }
        }

        let mut waypoints = Vec::new();
        if waypoints.try_reserve_exact(tiles.len()).is_err() {
            log::error!("out of memory for {} waypoints; resetting caches", tiles.len());
            self.reset();
            return Err(PathError::OutOfMemory);
        }
        waypoints.extend_from_slice(&tiles);
        self.path = tiles;

        if must_reverse {
            let ctx = &mut self.contexts[index];
            // Searching from the destination could never reach a blocked
            // origin, so only re-prime when it is passable.
            if !ctx.is_blocked(tile_orig) {
                let nearest = ctx.nearest;
                ctx.init(blocking, tile_dest, nearest, tile_orig, Anchor::Destination);
            }
        }

        if index != 0 {
            if let Some(ctx) = self.contexts.remove(index) {
                self.contexts.push_front(ctx);
            }
        }

        let destination = waypoints.last().copied().unwrap_or(job.destination);
        Ok(Route {
            status,
            waypoints,
            destination,
        })
    }

    /// Anchors of the cached contexts, most recently used first.
    #[cfg(test)]
    pub(crate) fn anchors(&self) -> Vec<Point> {
        self.contexts.iter().map(|c| c.tile_s).collect()
    }
}
