//! Compass facings and grid coordinates.
//!
//! The grid uses screen orientation: `x` grows east, `y` grows south.
//! Facings are numbered clockwise from north, so rotating by `+1` is a 45°
//! clockwise turn and `facing ^ 4` is the opposite direction.

use std::fmt;

/// Sub-cell resolution: one cell edge is 256 leptons.
pub const CELL_LEPTONS: i32 = 256;

// ── Facing ────────────────────────────────────────────────────────────────────

/// One of the eight compass directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Facing {
    North     = 0,
    NorthEast = 1,
    East      = 2,
    SouthEast = 3,
    South     = 4,
    SouthWest = 5,
    West      = 6,
    NorthWest = 7,
}

impl Facing {
    /// All facings in clockwise order starting at north.
    pub const ALL: [Facing; 8] = [
        Facing::North,
        Facing::NorthEast,
        Facing::East,
        Facing::SouthEast,
        Facing::South,
        Facing::SouthWest,
        Facing::West,
        Facing::NorthWest,
    ];

    /// Facing for `i mod 8`.
    #[inline]
    pub fn from_index(i: u8) -> Facing {
        Self::ALL[(i & 7) as usize]
    }

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Rotate by `steps` eighth-turns; positive is clockwise.
    #[inline]
    pub fn rotate(self, steps: i32) -> Facing {
        Facing::from_index((self as i32 + steps).rem_euclid(8) as u8)
    }

    #[inline]
    pub fn opposite(self) -> Facing {
        self.rotate(4)
    }

    #[inline]
    pub fn is_diagonal(self) -> bool {
        (self as u8) & 1 == 1
    }

    /// Clockwise eighth-turns from `self` to `other`, in `0..8`.
    #[inline]
    pub fn turn_to(self, other: Facing) -> u8 {
        (other as u8).wrapping_sub(self as u8) & 7
    }

    /// Unit cell offset `(dx, dy)`.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::North     => (0, -1),
            Facing::NorthEast => (1, -1),
            Facing::East      => (1, 0),
            Facing::SouthEast => (1, 1),
            Facing::South     => (0, 1),
            Facing::SouthWest => (-1, 1),
            Facing::West      => (-1, 0),
            Facing::NorthWest => (-1, -1),
        }
    }

    /// Bearing from `from` to `to` quantized to the nearest of the eight
    /// facings.  `None` when the two cells coincide.
    ///
    /// A straight facing is chosen when the minor axis is under
    /// `tan(22.5°) ≈ 5/12` of the major axis; otherwise the diagonal.  Every
    /// step taken along this bearing reduces the Chebyshev distance by one.
    pub fn toward(from: CellCoord, to: CellCoord) -> Option<Facing> {
        let dx = (to.x - from.x) as i64;
        let dy = (to.y - from.y) as i64;
        if dx == 0 && dy == 0 {
            return None;
        }
        let (ax, ay) = (dx.abs(), dy.abs());
        let (major, minor) = if ax >= ay { (ax, ay) } else { (ay, ax) };

        let facing = if 12 * minor < 5 * major {
            if ax >= ay {
                if dx > 0 { Facing::East } else { Facing::West }
            } else if dy > 0 {
                Facing::South
            } else {
                Facing::North
            }
        } else {
            match (dx > 0, dy > 0) {
                (true, true)   => Facing::SouthEast,
                (true, false)  => Facing::NorthEast,
                (false, true)  => Facing::SouthWest,
                (false, false) => Facing::NorthWest,
            }
        };
        Some(facing)
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Facing::North     => "N",
            Facing::NorthEast => "NE",
            Facing::East      => "E",
            Facing::SouthEast => "SE",
            Facing::South     => "S",
            Facing::SouthWest => "SW",
            Facing::West      => "W",
            Facing::NorthWest => "NW",
        };
        f.write_str(s)
    }
}

// ── CellCoord ─────────────────────────────────────────────────────────────────

/// Integer cell position.  May lie off the map; the grid decides validity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn step(self, facing: Facing) -> CellCoord {
        let (dx, dy) = facing.delta();
        CellCoord::new(self.x + dx, self.y + dy)
    }

    /// 8-direction move count between two cells.
    #[inline]
    pub fn chebyshev(self, other: CellCoord) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ── Coord ─────────────────────────────────────────────────────────────────────

/// Sub-cell position in leptons.  Many coordinates map onto one cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// The lepton position at the center of `cell`.
    #[inline]
    pub fn cell_center(cell: CellCoord) -> Coord {
        Coord {
            x: cell.x * CELL_LEPTONS + CELL_LEPTONS / 2,
            y: cell.y * CELL_LEPTONS + CELL_LEPTONS / 2,
        }
    }

    /// The cell containing this coordinate.
    #[inline]
    pub fn cell(self) -> CellCoord {
        CellCoord::new(self.x.div_euclid(CELL_LEPTONS), self.y.div_euclid(CELL_LEPTONS))
    }
}
