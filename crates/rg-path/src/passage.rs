//! The passability ladder: how hard is it for *this* unit to enter *that*
//! cell?
//!
//! One function covers every unit class.  Differences between infantry,
//! vehicles, ships and aircraft come from the `Locomotion` and `ZoneKind`
//! carried in the [`MoveProfile`], never from per-type overrides.

use rg_core::{CellId, HouseId, Locomotion, MoveType, ObjectId, ZoneKind};
use rg_grid::{GridError, GridResult, ObjectKind, ObjectRecord, World};

/// Everything about a unit that passability depends on.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveProfile {
    /// The moving object itself; never blocks its own path.
    pub object:     ObjectId,
    pub owner:      HouseId,
    pub locomotion: Locomotion,
    pub zone_kind:  ZoneKind,
    /// Can shoot its way through enemies and enemy structures.
    pub armed:      bool,
}

impl MoveProfile {
    /// Profile for a live mobile object, using its kind's default locomotion.
    /// Vessels route by water zones, everything else by normal zones.
    pub fn for_object(world: &World, object: ObjectId) -> GridResult<Self> {
        let record = world.object(object)?;
        let locomotion = record.kind.default_locomotion().ok_or(GridError::NotMovable(object))?;
        let zone_kind = match record.kind {
            ObjectKind::Vessel => ZoneKind::Water,
            _ => ZoneKind::Normal,
        };
        Ok(Self { object, owner: record.owner, locomotion, zone_kind, armed: false })
    }

    pub fn with_zone_kind(mut self, zone_kind: ZoneKind) -> Self {
        self.zone_kind = zone_kind;
        self
    }

    pub fn with_locomotion(mut self, locomotion: Locomotion) -> Self {
        self.locomotion = locomotion;
        self
    }

    pub fn armed(mut self, armed: bool) -> Self {
        self.armed = armed;
        self
    }

    #[inline]
    fn is_infantry(&self) -> bool {
        self.locomotion == Locomotion::Foot
    }
}

/// Classify `cell` for the unit described by `profile`.
///
/// Terrain and walls are checked first through `Grid::is_clear_to_move`
/// (with units masked out), then every other object in the cell's occupant
/// chain and overlap list is ranked and the worst result wins.
pub fn can_enter(world: &World, profile: &MoveProfile, cell: CellId) -> MoveType {
    let grid = &world.grid;
    let Some(c) = grid.get(cell) else {
        return MoveType::No;
    };
    if profile.locomotion == Locomotion::Winged {
        return MoveType::Ok;
    }
    if !grid.is_clear_to_move(cell, profile.locomotion, true, true, None, profile.zone_kind) {
        return MoveType::No;
    }

    let mut worst = if c.overlay.is_wall() && profile.zone_kind == ZoneKind::Destroyer {
        MoveType::Destroyable
    } else {
        MoveType::Ok
    };

    for &other in c.occupants().iter().chain(c.overlappers()) {
        if other == profile.object {
            continue;
        }
        let Some(record) = world.objects.get(other) else {
            continue;
        };
        worst = worst.max(rank(world, profile, cell, record));
        if worst == MoveType::No {
            break;
        }
    }
    worst
}

fn rank(world: &World, profile: &MoveProfile, cell: CellId, other: &ObjectRecord) -> MoveType {
    let allied = other.is_allied(profile.owner);
    match other.kind {
        ObjectKind::Aircraft => MoveType::Ok,
        ObjectKind::Terrain  => MoveType::No,
        ObjectKind::Building { .. } => {
            if !allied && profile.armed { MoveType::Destroyable } else { MoveType::No }
        }
        ObjectKind::Infantry | ObjectKind::Vehicle | ObjectKind::Vessel => {
            if allied {
                if profile.is_infantry() && other.kind == ObjectKind::Infantry {
                    // Infantry share cells while a sub-position is free.
                    if world.grid.free_spot(cell).is_some() { MoveType::Ok } else { MoveType::Temp }
                } else if other.driving {
                    MoveType::MovingBlock
                } else {
                    MoveType::Temp
                }
            } else if other.kind == ObjectKind::Infantry && profile.zone_kind == ZoneKind::Crusher {
                MoveType::Ok
            } else if profile.armed {
                MoveType::Destroyable
            } else {
                MoveType::No
            }
        }
    }
}
