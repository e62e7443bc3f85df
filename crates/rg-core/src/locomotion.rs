//! Movement capability classes and the passability ladder.

use std::fmt;

// ── Locomotion ────────────────────────────────────────────────────────────────

/// How a unit moves.  Determines which land types it can cross.
///
/// Passability differences between infantry, vehicles, ships and aircraft are
/// all expressed through this tag and consulted by one generic passability
/// function, rather than per-unit-type overrides.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Locomotion {
    Foot,
    #[default]
    Track,
    Wheel,
    /// Flying; ignores terrain and occupancy entirely.
    Winged,
    /// Ships; water only.
    Float,
}

impl Locomotion {
    pub const ALL: [Locomotion; 5] = [
        Locomotion::Foot,
        Locomotion::Track,
        Locomotion::Wheel,
        Locomotion::Winged,
        Locomotion::Float,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// ── ZoneKind ──────────────────────────────────────────────────────────────────

/// Which connectivity labelling a unit is routed by.
///
/// Each kind treats walls differently, so a cell can be in one component for
/// a wall-crushing tank and a different one for a jeep.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneKind {
    /// Every wall blocks.
    #[default]
    Normal,
    /// Crushable walls (sandbags, fences) are passable.
    Crusher,
    /// All walls are passable (the unit can shoot them down).
    Destroyer,
    /// Floating locomotion over water.
    Water,
}

impl ZoneKind {
    pub const COUNT: usize = 4;

    pub const ALL: [ZoneKind; ZoneKind::COUNT] = [
        ZoneKind::Normal,
        ZoneKind::Crusher,
        ZoneKind::Destroyer,
        ZoneKind::Water,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The locomotion used when flood-filling this kind's zones.
    #[inline]
    pub fn flood_locomotion(self) -> Locomotion {
        match self {
            ZoneKind::Water => Locomotion::Float,
            _ => Locomotion::Track,
        }
    }
}

// ── MoveType ──────────────────────────────────────────────────────────────────

/// How hard it is for a particular unit to enter a particular cell.
///
/// Ordered from easiest to impossible.  The pathfinder accepts a cell when
/// its `MoveType` is at or below the caller's threshold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MoveType {
    /// Clear.
    #[default]
    Ok,
    /// Blocked by an allied unit that is itself driving; likely to clear.
    MovingBlock,
    /// Blocked by something this unit can destroy.
    Destroyable,
    /// Blocked by a stationary allied unit.
    Temp,
    /// Impassable.
    No,
}

impl MoveType {
    /// Every threshold from `Ok` up to and including `max`, in order.
    pub const LADDER: [MoveType; 4] = [
        MoveType::Ok,
        MoveType::MovingBlock,
        MoveType::Destroyable,
        MoveType::Temp,
    ];

    /// Path cost of entering a cell of this type.  `0` means impassable.
    #[inline]
    pub fn cost(self) -> u32 {
        match self {
            MoveType::Ok          => 1,
            MoveType::MovingBlock => 3,
            MoveType::Destroyable => 8,
            MoveType::Temp        => 10,
            MoveType::No          => 0,
        }
    }

    /// Thresholds to try in turn, cheapest first, stopping at `max`.
    pub fn ladder_to(max: MoveType) -> impl Iterator<Item = MoveType> {
        Self::LADDER.into_iter().filter(move |&t| t <= max)
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoveType::Ok          => "ok",
            MoveType::MovingBlock => "moving-block",
            MoveType::Destroyable => "destroyable",
            MoveType::Temp        => "temp",
            MoveType::No          => "no",
        };
        f.write_str(s)
    }
}
