//! Object slot table.
//!
//! Objects are addressed by `ObjectId` handles into a `Vec` of optional
//! slots.  Freed slots are reused last-in first-out, so a handle stays valid
//! exactly as long as its object lives.

use rg_core::{CellId, HouseId, Locomotion, ObjectId};

use crate::cell::{Footprint, Spot};

/// What an object is, as far as occupancy is concerned.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    Infantry,
    Vehicle,
    Vessel,
    Aircraft,
    /// Multi-cell structure anchored at its north-west cell.
    Building { width: u8, height: u8 },
    /// Trees, rocks: permanent single-cell obstructions.
    Terrain,
}

impl ObjectKind {
    /// Can this kind be driven at all?
    #[inline]
    pub fn is_mobile(self) -> bool {
        matches!(
            self,
            ObjectKind::Infantry | ObjectKind::Vehicle | ObjectKind::Vessel | ObjectKind::Aircraft
        )
    }

    /// Locomotion a mobile kind uses unless told otherwise.
    pub fn default_locomotion(self) -> Option<Locomotion> {
        match self {
            ObjectKind::Infantry => Some(Locomotion::Foot),
            ObjectKind::Vehicle  => Some(Locomotion::Track),
            ObjectKind::Vessel   => Some(Locomotion::Float),
            ObjectKind::Aircraft => Some(Locomotion::Winged),
            ObjectKind::Building { .. } | ObjectKind::Terrain => None,
        }
    }
}

/// One live object.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectRecord {
    pub kind:    ObjectKind,
    pub owner:   HouseId,
    /// Primary cell.  Must agree with the occupant chain that holds this id.
    pub cell:    CellId,
    /// Infantry sub-position; `None` for everything else.
    pub spot:    Option<Spot>,
    /// Set while a mover is actively driving this object.
    pub driving: bool,
}

impl ObjectRecord {
    pub fn new(kind: ObjectKind, owner: HouseId, cell: CellId) -> Self {
        Self { kind, owner, cell, spot: None, driving: false }
    }

    /// The occupancy bit this object sets in its primary cell.
    pub fn footprint(&self) -> Footprint {
        match self.kind {
            ObjectKind::Infantry => Footprint::Infantry(self.spot.unwrap_or(Spot::Center)),
            ObjectKind::Vehicle | ObjectKind::Vessel => Footprint::Vehicle,
            ObjectKind::Aircraft       => Footprint::Airborne,
            ObjectKind::Building { .. } => Footprint::Building,
            ObjectKind::Terrain        => Footprint::Monolith,
        }
    }

    #[inline]
    pub fn is_allied(&self, owner: HouseId) -> bool {
        self.owner == owner
    }
}

/// Slot table of live objects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTable {
    slots: Vec<Option<ObjectRecord>>,
    free:  Vec<ObjectId>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record`, reusing the most recently freed slot if any.
    pub fn insert(&mut self, record: ObjectRecord) -> ObjectId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(record);
            id
        } else {
            let id = ObjectId(self.slots.len() as u32);
            self.slots.push(Some(record));
            id
        }
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<ObjectRecord> {
        let record = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id);
        Some(record)
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&ObjectRecord> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut ObjectRecord> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Live objects in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &ObjectRecord)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|r| (ObjectId(i as u32), r)))
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
