//! A single grid tile: terrain, overlay, occupancy, and zone labels.

use rg_core::{ObjectId, ZoneKind};

// ── Terrain ───────────────────────────────────────────────────────────────────

/// Base terrain of a cell.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LandType {
    #[default]
    Clear,
    Road,
    Water,
    Rock,
    Wall,
    Ore,
    Beach,
    Rough,
    River,
}

/// Something lying on top of the terrain.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Overlay {
    #[default]
    None,
    /// Crushable wall.
    Sandbag,
    /// Crushable wall.
    Fence,
    /// Uncrushable wall.
    Concrete,
    /// Harvestable ore field; behaves as `LandType::Ore`.
    Ore,
}

impl Overlay {
    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, Overlay::Sandbag | Overlay::Fence | Overlay::Concrete)
    }

    /// Tracked crushers drive straight over these walls.
    #[inline]
    pub fn is_crushable(self) -> bool {
        matches!(self, Overlay::Sandbag | Overlay::Fence)
    }
}

// ── Sub-positions ─────────────────────────────────────────────────────────────

/// Named bit positions of the per-cell occupancy bitset.
///
/// The first five are infantry sub-positions; the remaining three are coarse
/// flags for whole-cell occupants.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Spot {
    Center    = 0,
    NorthWest = 1,
    NorthEast = 2,
    SouthWest = 3,
    SouthEast = 4,
    Vehicle   = 5,
    Monolith  = 6,
    Building  = 7,
}

impl Spot {
    /// Infantry sub-positions in the order new arrivals take them.
    pub const INFANTRY: [Spot; 5] = [
        Spot::Center,
        Spot::NorthWest,
        Spot::NorthEast,
        Spot::SouthWest,
        Spot::SouthEast,
    ];

    #[inline]
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    #[inline]
    pub fn is_infantry(self) -> bool {
        (self as u8) <= Spot::SouthEast as u8
    }
}

/// Fixed-size enum-indexed occupancy bitset.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct OccupyFlags(u8);

impl OccupyFlags {
    /// Center and the four quadrants.
    pub const INFANTRY_MASK: u8 = 0b0001_1111;
    /// Vehicle and building flags.
    pub const VEHICLE_MASK:  u8 = 0b1010_0000;

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(self, spot: Spot) -> bool {
        self.0 & spot.bit() != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub(crate) fn insert(&mut self, spot: Spot) {
        self.0 |= spot.bit();
    }

    #[inline]
    pub(crate) fn remove(&mut self, spot: Spot) {
        self.0 &= !spot.bit();
    }

    /// The bits that still block once the requested classes are ignored.
    /// The monolith bit is never masked.
    #[inline]
    pub fn blocking(self, ignore_infantry: bool, ignore_vehicles: bool) -> u8 {
        let mut bits = self.0;
        if ignore_infantry {
            bits &= !Self::INFANTRY_MASK;
        }
        if ignore_vehicles {
            bits &= !Self::VEHICLE_MASK;
        }
        bits
    }
}

/// Which bit an object sets in the cell it occupies.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Footprint {
    /// One infantry sub-position.
    Infantry(Spot),
    Vehicle,
    Building,
    /// Trees, rocks, and other terrain objects.
    Monolith,
    /// In the chain but sets no flag (aircraft in flight).
    Airborne,
}

impl Footprint {
    #[inline]
    pub fn flag(self) -> Option<Spot> {
        match self {
            Footprint::Infantry(spot) => Some(spot),
            Footprint::Vehicle        => Some(Spot::Vehicle),
            Footprint::Building       => Some(Spot::Building),
            Footprint::Monolith       => Some(Spot::Monolith),
            Footprint::Airborne       => None,
        }
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One tile of the grid.
///
/// Terrain fields are public; occupancy and zones are maintained by
/// [`Grid`][crate::Grid] and [`World`][crate::World] only, so they are
/// exposed read-only.
#[derive(Clone, Debug, Default)]
pub struct Cell {
    pub land:    LandType,
    pub overlay: Overlay,

    pub(crate) flags:       OccupyFlags,
    /// Objects whose primary position is this cell.  Front = reported first.
    pub(crate) occupants:   Vec<ObjectId>,
    /// Objects whose footprint spans into this cell from elsewhere.
    pub(crate) overlappers: Vec<ObjectId>,
    pub(crate) zones:       [u16; ZoneKind::COUNT],
}

impl Cell {
    /// Effective land type once the overlay is taken into account.
    #[inline]
    pub fn land_type(&self) -> LandType {
        match self.overlay {
            o if o.is_wall() => LandType::Wall,
            Overlay::Ore     => LandType::Ore,
            _                => self.land,
        }
    }

    #[inline]
    pub fn flags(&self) -> OccupyFlags {
        self.flags
    }

    #[inline]
    pub fn occupants(&self) -> &[ObjectId] {
        &self.occupants
    }

    #[inline]
    pub fn overlappers(&self) -> &[ObjectId] {
        &self.overlappers
    }

    /// Connectivity label for `kind`; `0` means the cell is in no zone.
    #[inline]
    pub fn zone(&self, kind: ZoneKind) -> u16 {
        self.zones[kind.index()]
    }

    /// Reset everything derived from objects.  Terrain and zones stay.
    pub(crate) fn clear_occupancy(&mut self) {
        self.flags = OccupyFlags::default();
        self.occupants.clear();
        self.overlappers.clear();
    }
}
