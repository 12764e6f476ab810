//! Random battlefield generation.
//!
//! Lakes are grown with cellular automata smoothing, cliff ridges with a
//! random walk. Both only ever turn ground into something else, so they
//! can be layered.

use rand::{Rng, RngExt};
use tilepath_core::{Point, Range};

use crate::terrain::{Terrain, TerrainMap};

/// One round of cellular automata smoothing for [`MapGen::lakes`].
#[derive(Debug, Clone)]
pub struct LakeRule {
    /// A tile becomes water if at least this many of its 8 neighbours are
    /// water.
    pub cutoff: i32,
    /// Whether tiles off the map count as water.
    pub water_out_of_range: bool,
    /// How many times to apply this rule.
    pub reps: usize,
}

impl Default for LakeRule {
    fn default() -> Self {
        Self {
            cutoff: 5,
            water_out_of_range: false,
            reps: 4,
        }
    }
}

/// Map generator working on a [`TerrainMap`].
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub map: TerrainMap,
}

impl<R: Rng> MapGen<R> {
    /// Start from an all-ground map.
    pub fn new(width: i32, height: i32, rng: R) -> Self {
        Self {
            rng,
            map: TerrainMap::new(width, height),
        }
    }

    /// Start from an existing map.
    pub fn with_map(map: TerrainMap, rng: R) -> Self {
        Self { rng, map }
    }

    /// Flood `init_pct` of the ground with water, then smooth it into
    /// lakes. Returns the number of water tiles afterwards.
    pub fn lakes(&mut self, init_pct: f64, rules: &[LakeRule]) -> usize {
        let rng = self.map.range();
        let ground: Vec<Point> = rng
            .iter()
            .filter(|&p| self.is_free_ground(p))
            .collect();
        let mut water: Vec<bool> = rng
            .iter()
            .map(|p| self.map.terrain(p) == Some(Terrain::Water))
            .collect();
        for &p in &ground {
            if self.rng.random_bool(init_pct.clamp(0.0, 1.0)) {
                if let Some(i) = rng.index(p) {
                    water[i] = true;
                }
            }
        }

        let mut scratch = water.clone();
        for rule in rules {
            for _ in 0..rule.reps {
                for &p in &ground {
                    let wet = count_neighbours(&water, rng, p, rule.water_out_of_range);
                    if let Some(i) = rng.index(p) {
                        scratch[i] = wet >= rule.cutoff;
                    }
                }
                water.copy_from_slice(&scratch);
            }
        }

        for p in ground {
            if rng.index(p).is_some_and(|i| water[i]) {
                self.map.set_terrain(p, Terrain::Water);
            }
        }
        let n = self.map.count(Terrain::Water);
        log::debug!("lakes: {n} water tiles on a {rng} map");
        n
    }

    /// Raise `count` cliff ridges by random walks of up to `length` steps.
    /// Returns the number of tiles turned into cliff.
    pub fn ridges(&mut self, count: usize, length: usize) -> usize {
        let rng = self.map.range();
        if rng.is_empty() {
            return 0;
        }
        let mut raised = 0;
        for _ in 0..count {
            let mut pos = Point::new(
                self.rng.random_range(rng.min.x..rng.max.x),
                self.rng.random_range(rng.min.y..rng.max.y),
            );
            // Ridges keep a heading and drift sideways now and then.
            let mut dir = self.rng.random_range(0..4usize);
            for _ in 0..length {
                if self.is_free_ground(pos) {
                    self.map.set_terrain(pos, Terrain::Cliff);
                    raised += 1;
                }
                if self.rng.random_bool(0.25) {
                    dir = (dir + if self.rng.random_bool(0.5) { 1 } else { 3 }) % 4;
                }
                let (dx, dy) = [(1, 0), (0, 1), (-1, 0), (0, -1)][dir];
                let next = pos.shift(dx, dy);
                if !rng.contains(next) {
                    break;
                }
                pos = next;
            }
        }
        raised
    }

    /// Place a structure for each of `owners` on a random ground tile.
    /// Returns where they went; owners that found no free ground after a
    /// bounded number of tries are skipped.
    pub fn structures(&mut self, owners: &[u8]) -> Vec<Point> {
        let rng = self.map.range();
        let mut placed = Vec::with_capacity(owners.len());
        if rng.is_empty() {
            return placed;
        }
        for &owner in owners {
            for _ in 0..rng.len() {
                let p = Point::new(
                    self.rng.random_range(rng.min.x..rng.max.x),
                    self.rng.random_range(rng.min.y..rng.max.y),
                );
                if self.is_free_ground(p) {
                    self.map.place_structure(p, owner);
                    placed.push(p);
                    break;
                }
            }
        }
        placed
    }

    fn is_free_ground(&self, p: Point) -> bool {
        self.map.terrain(p) == Some(Terrain::Ground) && self.map.structure(p).is_none()
    }

    /// Consume the generator, returning the map.
    pub fn finish(self) -> TerrainMap {
        self.map
    }
}

fn count_neighbours(water: &[bool], rng: Range, p: Point, out_of_range: bool) -> i32 {
    let mut n = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            match rng.index(p.shift(dx, dy)) {
                Some(i) if water[i] => n += 1,
                Some(_) => {}
                None if out_of_range => n += 1,
                None => {}
            }
        }
    }
    n
}
