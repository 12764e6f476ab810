//! Terrain and structure layout of a battlefield.
//!
//! Maps are written as ASCII art, one character per tile:
//!
//! | char | tile |
//! |------|------|
//! | `.` | ground |
//! | `~` | water |
//! | `#` | cliff |
//! | `0`-`9` | ground with a structure owned by that player |
//!
//! Lines are separated by `'\n'` and must all have the same width.

use std::fmt;

use tilepath::BlockingSource;
use tilepath_core::{MoveSignature, MoveType, Point, PropulsionClass, Range};

/// Base terrain kind of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    #[default]
    Ground,
    Water,
    Cliff,
}

impl Terrain {
    /// Map character for this terrain.
    pub const fn to_char(self) -> char {
        match self {
            Terrain::Ground => '.',
            Terrain::Water => '~',
            Terrain::Cliff => '#',
        }
    }

    /// Whether units of `class` can stand on this terrain, ignoring
    /// structures.
    pub const fn passable_by(self, class: PropulsionClass) -> bool {
        match (self, class) {
            (_, PropulsionClass::Air) => true,
            (Terrain::Cliff, _) => false,
            (Terrain::Ground, PropulsionClass::Water) => false,
            (Terrain::Water, PropulsionClass::Ground) => false,
            _ => true,
        }
    }
}

/// A rectangular map of terrain with optional structures on top.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainMap {
    rng: Range,
    cells: Vec<Terrain>,
    /// Owner of the structure standing on each tile, if any.
    structures: Vec<Option<u8>>,
}

impl TerrainMap {
    /// An all-ground map without structures.
    pub fn new(width: i32, height: i32) -> Self {
        let rng = Range::with_size(width.max(0), height.max(0));
        Self {
            rng,
            cells: vec![Terrain::Ground; rng.len()],
            structures: vec![None; rng.len()],
        }
    }

    /// Parse a map from ASCII art.
    ///
    /// Leading and trailing whitespace of the whole string is ignored, as
    /// is a trailing `'\r'` on each line.
    pub fn parse(s: &str) -> Result<Self, TerrainError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TerrainError::Empty);
        }

        let lines: Vec<&str> = s.lines().map(|l| l.trim_end_matches('\r')).collect();
        let width = lines[0].chars().count();
        let mut cells = Vec::with_capacity(width * lines.len());
        let mut structures = Vec::with_capacity(width * lines.len());
        for (y, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(TerrainError::InconsistentSize {
                    line: y,
                    expected: width,
                    found,
                });
            }
            for (x, ch) in line.chars().enumerate() {
                let (terrain, owner) = match ch {
                    '.' => (Terrain::Ground, None),
                    '~' => (Terrain::Water, None),
                    '#' => (Terrain::Cliff, None),
                    '0'..='9' => (Terrain::Ground, Some(ch as u8 - b'0')),
                    _ => {
                        return Err(TerrainError::InvalidChar {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                };
                cells.push(terrain);
                structures.push(owner);
            }
        }

        Ok(Self {
            rng: Range::with_size(width as i32, lines.len() as i32),
            cells,
            structures,
        })
    }

    pub fn width(&self) -> i32 {
        self.rng.width()
    }

    pub fn height(&self) -> i32 {
        self.rng.height()
    }

    /// Tile bounds of the map.
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Terrain at `p`, or `None` off the map.
    pub fn terrain(&self, p: Point) -> Option<Terrain> {
        self.rng.index(p).map(|i| self.cells[i])
    }

    /// Set the terrain at `p`. Returns `false` if `p` is off the map.
    pub fn set_terrain(&mut self, p: Point, terrain: Terrain) -> bool {
        match self.rng.index(p) {
            Some(i) => {
                self.cells[i] = terrain;
                true
            }
            None => false,
        }
    }

    /// Owner of the structure at `p`, if there is one.
    pub fn structure(&self, p: Point) -> Option<u8> {
        self.rng.index(p).and_then(|i| self.structures[i])
    }

    /// Place a structure owned by `owner` at `p`, replacing any other.
    /// Returns `false` if `p` is off the map.
    pub fn place_structure(&mut self, p: Point, owner: u8) -> bool {
        match self.rng.index(p) {
            Some(i) => {
                self.structures[i] = Some(owner);
                true
            }
            None => false,
        }
    }

    /// Remove the structure at `p`, returning its owner.
    pub fn remove_structure(&mut self, p: Point) -> Option<u8> {
        let i = self.rng.index(p)?;
        self.structures[i].take()
    }

    /// Number of tiles with the given terrain.
    pub fn count(&self, terrain: Terrain) -> usize {
        self.cells.iter().filter(|&&t| t == terrain).count()
    }

    /// Character used for `p` when printing the map.
    pub fn char_at(&self, p: Point) -> Option<char> {
        let i = self.rng.index(p)?;
        Some(match self.structures[i] {
            // Owners above 9 have no digit of their own.
            Some(owner) => char::from_digit(u32::from(owner.min(9)), 10).unwrap_or('9'),
            None => self.cells[i].to_char(),
        })
    }
}

impl BlockingSource for TerrainMap {
    fn is_blocking(&self, tile: Point, sig: MoveSignature) -> bool {
        let Some(i) = self.rng.index(tile) else {
            return true;
        };
        let class = sig.propulsion.class();
        if class == PropulsionClass::Air {
            return false;
        }
        if !self.cells[i].passable_by(class) {
            return true;
        }
        match (self.structures[i], sig.move_type) {
            (None, _) => false,
            (Some(_), MoveType::Move) => true,
            (Some(owner), MoveType::Attack) => owner == sig.owner,
        }
    }

    fn equivalent_blocking(&self, a: MoveSignature, b: MoveSignature) -> bool {
        a.propulsion.class() == b.propulsion.class()
            && a.move_type == b.move_type
            && (a.move_type == MoveType::Move || a.owner == b.owner)
    }
}

impl fmt::Display for TerrainMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            if y > 0 {
                writeln!(f)?;
            }
            for x in 0..self.width() {
                let ch = self.char_at(Point::new(x, y)).unwrap_or(' ');
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for TerrainMap {
    type Err = TerrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Error type for [`TerrainMap::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerrainError {
    /// No map lines at all.
    Empty,
    /// A line is wider or narrower than the first one.
    InconsistentSize {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A character with no terrain meaning.
    InvalidChar { ch: char, pos: Point },
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("terrain map is empty"),
            Self::InconsistentSize {
                line,
                expected,
                found,
            } => write!(
                f,
                "terrain map line {line} is {found} tiles wide, expected {expected}"
            ),
            Self::InvalidChar { ch, pos } => {
                write!(f, "terrain map contains invalid character \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for TerrainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tilepath_core::Propulsion;

    const SHORE: &str = "\
..~~#
.1~~.
..~~2";

    fn sig(propulsion: Propulsion, owner: u8, move_type: MoveType) -> MoveSignature {
        MoveSignature::new(propulsion, owner, move_type)
    }

    #[test]
    fn parse_and_size() {
        let map = TerrainMap::parse(SHORE).unwrap();
        assert_eq!(map.width(), 5);
        assert_eq!(map.height(), 3);
        assert_eq!(map.terrain(Point::new(2, 0)), Some(Terrain::Water));
        assert_eq!(map.terrain(Point::new(4, 0)), Some(Terrain::Cliff));
        assert_eq!(map.terrain(Point::new(1, 1)), Some(Terrain::Ground));
        assert_eq!(map.structure(Point::new(1, 1)), Some(1));
        assert_eq!(map.structure(Point::new(4, 2)), Some(2));
        assert_eq!(map.terrain(Point::new(5, 0)), None);
        assert_eq!(map.count(Terrain::Water), 6);
    }

    #[test]
    fn display_round_trips() {
        let map = TerrainMap::parse(SHORE).unwrap();
        assert_eq!(map.to_string(), SHORE);
        let again: TerrainMap = map.to_string().parse().unwrap();
        assert_eq!(again, map);
    }

    #[test]
    fn crlf_lines_are_accepted() {
        let map = TerrainMap::parse("..\r\n~~\r\n").unwrap();
        assert_eq!(map.range(), Range::with_size(2, 2));
    }

    #[test]
    fn parse_errors() {
        assert_eq!(TerrainMap::parse("  \n "), Err(TerrainError::Empty));
        assert_eq!(
            TerrainMap::parse("...\n..\n..."),
            Err(TerrainError::InconsistentSize {
                line: 1,
                expected: 3,
                found: 2,
            })
        );
        let err = TerrainMap::parse("..\n.x").unwrap_err();
        assert_eq!(
            err,
            TerrainError::InvalidChar {
                ch: 'x',
                pos: Point::new(1, 1),
            }
        );
        assert_eq!(
            err.to_string(),
            "terrain map contains invalid character \u{201c}x\u{201d} at (1, 1)"
        );
    }

    #[test]
    fn terrain_blocks_by_class() {
        let map = TerrainMap::parse(SHORE).unwrap();
        let water = Point::new(2, 1);
        let cliff = Point::new(4, 0);
        let ground = Point::new(0, 0);
        let wheels = sig(Propulsion::Wheeled, 0, MoveType::Move);
        let hover = sig(Propulsion::Hover, 0, MoveType::Move);
        let boat = sig(Propulsion::Propellor, 0, MoveType::Move);
        let vtol = sig(Propulsion::Lift, 0, MoveType::Move);

        assert!(!map.is_blocking(ground, wheels));
        assert!(map.is_blocking(water, wheels));
        assert!(map.is_blocking(cliff, wheels));

        assert!(!map.is_blocking(ground, hover));
        assert!(!map.is_blocking(water, hover));
        assert!(map.is_blocking(cliff, hover));

        assert!(map.is_blocking(ground, boat));
        assert!(!map.is_blocking(water, boat));
        assert!(map.is_blocking(cliff, boat));

        for p in map.range() {
            assert!(!map.is_blocking(p, vtol), "air blocked at {p}");
        }
        assert!(map.is_blocking(Point::new(-1, 0), vtol));
    }

    #[test]
    fn structures_block_movers_and_own_attackers() {
        let map = TerrainMap::parse(SHORE).unwrap();
        let base = Point::new(1, 1);
        assert!(map.is_blocking(base, sig(Propulsion::Tracked, 1, MoveType::Move)));
        assert!(map.is_blocking(base, sig(Propulsion::Tracked, 3, MoveType::Move)));
        assert!(map.is_blocking(base, sig(Propulsion::Tracked, 1, MoveType::Attack)));
        assert!(!map.is_blocking(base, sig(Propulsion::Tracked, 3, MoveType::Attack)));
        assert!(!map.is_blocking(base, sig(Propulsion::Lift, 3, MoveType::Move)));
    }

    #[test]
    fn equivalence_groups() {
        let map = TerrainMap::new(1, 1);
        let wheels = sig(Propulsion::Wheeled, 0, MoveType::Move);
        assert!(map.equivalent_blocking(wheels, sig(Propulsion::Legged, 5, MoveType::Move)));
        assert!(!map.equivalent_blocking(wheels, sig(Propulsion::Hover, 0, MoveType::Move)));
        assert!(!map.equivalent_blocking(wheels, sig(Propulsion::Wheeled, 0, MoveType::Attack)));

        let attack = sig(Propulsion::Tracked, 2, MoveType::Attack);
        assert!(map.equivalent_blocking(attack, sig(Propulsion::HalfTracked, 2, MoveType::Attack)));
        assert!(!map.equivalent_blocking(attack, sig(Propulsion::Tracked, 4, MoveType::Attack)));
    }

    #[test]
    fn edit_tiles() {
        let mut map = TerrainMap::new(3, 2);
        assert!(map.set_terrain(Point::new(2, 1), Terrain::Water));
        assert!(!map.set_terrain(Point::new(3, 1), Terrain::Water));
        assert!(map.place_structure(Point::new(0, 1), 12));
        assert_eq!(map.char_at(Point::new(0, 1)), Some('9'));
        assert_eq!(map.remove_structure(Point::new(0, 1)), Some(12));
        assert_eq!(map.remove_structure(Point::new(0, 1)), None);
        assert_eq!(map.to_string(), "...\n..~");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn terrain_map_round_trip() {
        let map = TerrainMap::parse(".~#\n1..").unwrap();
        let json = serde_json::to_string(&map).unwrap();
        let back: TerrainMap = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }
}
