//! Convoy simulation shared by the demo binaries.
//!
//! A column of units is ordered to one destination and replans every tick,
//! which is the access pattern the planner's context cache is built for:
//! the first unit pays for the search, the rest resume it.

use rand::{Rng, RngExt};
use tilepath::{
    BlockingSource, MoveSignature, PathError, PathJob, PathPlanner, PlannerConfig, Point, Route,
    RouteStatus,
};
use tilepath_core::{map_coord, tile_center};
use tilepath_terrain::TerrainMap;

/// Default battlefield: a river with one ford, a few ridges and two bases.
pub const BUILTIN_MAP: &str = "\
................~~~.............
..###...........~~~......#......
..#.............~~~......#..11..
..#.......####..~~~......#..11..
..........#.....~~~......#......
..........#.....................
..........#.....~~~.............
....###.........~~~.....####....
................~~~.............
.......#........~~~......2......
.......#........~~~.............
................~~~.............";

/// One unit of the convoy.
#[derive(Debug, Clone)]
pub struct Unit {
    /// World position.
    pub pos: Point,
    pub signature: MoveSignature,
    /// Last route planned for the unit.
    pub route: Option<Route>,
}

impl Unit {
    pub fn tile(&self, tile_units: i32) -> Point {
        map_coord(self.pos, tile_units)
    }
}

/// Units, the map they drive on and the planner routing them.
pub struct Convoy {
    pub map: TerrainMap,
    pub planner: PathPlanner,
    pub units: Vec<Unit>,
    /// World position every unit is heading to.
    pub destination: Option<Point>,
    tick: u32,
}

impl Convoy {
    pub fn new(map: TerrainMap, config: PlannerConfig) -> Result<Self, PathError> {
        let planner = PathPlanner::with_config(map.width(), map.height(), config)?;
        Ok(Self {
            map,
            planner,
            units: Vec::new(),
            destination: None,
            tick: 0,
        })
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    fn tile_units(&self) -> i32 {
        self.planner.config().tile_units
    }

    /// Place up to `count` units on free tiles in the western quarter of
    /// the map. Returns how many were placed.
    pub fn spawn(&mut self, count: usize, signature: MoveSignature, rng: &mut impl Rng) -> usize {
        let units = self.tile_units();
        let west = (self.map.width() / 4).max(1);
        let mut free: Vec<Point> = self
            .map
            .range()
            .iter()
            .filter(|&p| p.x < west && !self.map.is_blocking(p, signature))
            .filter(|&p| !self.units.iter().any(|u| u.tile(units) == p))
            .collect();

        let mut placed = 0;
        while placed < count && !free.is_empty() {
            let tile = free.swap_remove(rng.random_range(0..free.len()));
            self.units.push(Unit {
                pos: tile_center(tile, units),
                signature,
                route: None,
            });
            placed += 1;
        }
        if placed < count {
            log::warn!("only room for {placed} of {count} units");
        }
        placed
    }

    /// Send every unit to `tile`.
    pub fn order(&mut self, tile: Point) -> Result<(), PathError> {
        self.destination = Some(tile_center(tile, self.tile_units()));
        self.replan()
    }

    /// Plan a fresh route for every unit from where it stands now.
    pub fn replan(&mut self) -> Result<(), PathError> {
        let Some(destination) = self.destination else {
            return Ok(());
        };
        for unit in &mut self.units {
            let job = PathJob {
                origin: unit.pos,
                destination,
                signature: unit.signature,
                game_time: self.tick,
            };
            unit.route = Some(self.planner.find_route(&self.map, &job)?);
        }
        Ok(())
    }

    /// Advance one tick: every unit moves `speed` waypoints along its
    /// route, then all routes are replanned. Returns the number of units
    /// still on the move.
    pub fn step(&mut self, speed: usize) -> Result<usize, PathError> {
        self.tick += 1;
        self.planner.begin_tick(self.tick);

        let mut moving = 0;
        for unit in &mut self.units {
            let Some(route) = &unit.route else {
                continue;
            };
            // `waypoints` never starts at the unit's own tile.
            let next = route.waypoints.iter().take(speed).last().copied();
            if let Some(next) = next {
                if next != unit.pos {
                    unit.pos = next;
                    moving += 1;
                }
            }
        }

        self.replan()?;
        Ok(moving)
    }

    /// Units that reached the destination, and units stuck at their
    /// nearest reachable tile.
    pub fn arrivals(&self) -> (usize, usize) {
        let mut exact = 0;
        let mut stuck = 0;
        for unit in &self.units {
            let Some(route) = &unit.route else {
                continue;
            };
            if unit.pos != route.destination {
                continue;
            }
            match route.status {
                RouteStatus::Exact => exact += 1,
                RouteStatus::Nearest => stuck += 1,
            }
        }
        (exact, stuck)
    }

    /// The map as ASCII with routes (`*`), units (`@`) and the
    /// destination (`X`) drawn over it.
    pub fn render(&self) -> String {
        let units = self.tile_units();
        let rng = self.map.range();
        let mut chars: Vec<char> = rng
            .iter()
            .map(|p| self.map.char_at(p).unwrap_or(' '))
            .collect();

        let mut put = |p: Point, ch: char| {
            if let Some(i) = rng.index(p) {
                chars[i] = ch;
            }
        };
        for unit in &self.units {
            if let Some(route) = &unit.route {
                for w in &route.waypoints {
                    put(map_coord(*w, units), '*');
                }
            }
        }
        if let Some(dest) = self.destination {
            put(map_coord(dest, units), 'X');
        }
        for unit in &self.units {
            put(unit.tile(units), '@');
        }

        let width = rng.width().max(1) as usize;
        chars
            .chunks(width)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse `x,y` into a tile.
pub fn parse_tile(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tilepath::{MoveType, Propulsion};

    fn convoy(propulsion: Propulsion, count: usize) -> Convoy {
        let map = TerrainMap::parse(BUILTIN_MAP).unwrap();
        let mut convoy = Convoy::new(map, PlannerConfig::default()).unwrap();
        let sig = MoveSignature::new(propulsion, 0, MoveType::Move);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(convoy.spawn(count, sig, &mut rng), count);
        convoy
    }

    #[test]
    fn builtin_map_parses() {
        let map = TerrainMap::parse(BUILTIN_MAP).unwrap();
        assert_eq!((map.width(), map.height()), (32, 12));
    }

    #[test]
    fn convoy_crosses_the_ford() {
        let mut convoy = convoy(Propulsion::Wheeled, 6);
        convoy.order(Point::new(30, 10)).unwrap();
        for _ in 0..80 {
            if convoy.step(1).unwrap() == 0 {
                break;
            }
        }
        assert_eq!(convoy.arrivals(), (6, 0));
        let stats = convoy.planner.stats();
        assert!(stats.fresh_searches < stats.queries);
    }

    #[test]
    fn base_destination_leaves_units_at_nearest() {
        let mut convoy = convoy(Propulsion::Tracked, 3);
        // A structure tile is blocked for movers.
        convoy.order(Point::new(28, 2)).unwrap();
        for _ in 0..60 {
            if convoy.step(2).unwrap() == 0 {
                break;
            }
        }
        let (exact, stuck) = convoy.arrivals();
        assert_eq!(exact, 0);
        assert_eq!(stuck, 3);
    }

    #[test]
    fn render_marks_units_and_destination() {
        let mut convoy = convoy(Propulsion::Hover, 2);
        convoy.order(Point::new(31, 0)).unwrap();
        let out = convoy.render();
        assert_eq!(out.lines().count(), 12);
        assert_eq!(out.matches('@').count(), 2);
        assert_eq!(out.lines().next().and_then(|l| l.chars().last()), Some('X'));
    }

    #[test]
    fn parse_tile_accepts_pairs() {
        assert_eq!(parse_tile("3, 4"), Ok(Point::new(3, 4)));
        assert!(parse_tile("3").is_err());
        assert!(parse_tile("a,4").is_err());
    }
}
