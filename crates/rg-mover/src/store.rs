//! The `MoverStore` — movers keyed by object handle.

use std::collections::BTreeMap;

use rg_core::ObjectId;

use crate::Mover;

/// All registered movers.  Ordered by `ObjectId` so iteration is the tick
/// processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoverStore {
    movers: BTreeMap<ObjectId, Mover>,
}

impl MoverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mover for `mover.object`.
    pub fn insert(&mut self, mover: Mover) -> Option<Mover> {
        self.movers.insert(mover.object, mover)
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Mover> {
        self.movers.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: ObjectId) -> Option<&Mover> {
        self.movers.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Mover> {
        self.movers.get_mut(&id)
    }

    /// Movers in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Mover> {
        self.movers.values()
    }

    /// Registered ids, ascending.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.movers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.movers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movers.is_empty()
    }

    /// Movers that are neither idle nor deploying.
    pub fn busy_count(&self) -> usize {
        self.movers
            .values()
            .filter(|m| !m.is_idle() && !matches!(m.state, crate::DriveState::Deploying { .. }))
            .count()
    }
}

impl FromIterator<Mover> for MoverStore {
    fn from_iter<I: IntoIterator<Item = Mover>>(iter: I) -> Self {
        Self { movers: iter.into_iter().map(|m| (m.object, m)).collect() }
    }
}
