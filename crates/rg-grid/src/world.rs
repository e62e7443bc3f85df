//! `World` — the grid plus the object table, kept in agreement.
//!
//! Every operation that changes where an object is goes through here, so the
//! occupant chains and each record's `cell` are updated together.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use rg_core::{CellCoord, CellId, HouseId, ObjectId};

use crate::cell::{Footprint, Spot};
use crate::object::{ObjectKind, ObjectRecord, ObjectTable};
use crate::{Grid, GridError, GridResult};

#[derive(Clone, Debug)]
pub struct World {
    pub grid:    Grid,
    pub objects: ObjectTable,
}

impl World {
    pub fn new(grid: Grid) -> Self {
        Self { grid, objects: ObjectTable::new() }
    }

    /// Reassemble a world from saved parts, rebuilding every chain and flag.
    pub fn from_parts(grid: Grid, objects: ObjectTable) -> GridResult<Self> {
        let mut world = Self { grid, objects };
        world.rebuild_occupancy()?;
        Ok(world)
    }

    #[inline]
    pub fn object(&self, id: ObjectId) -> GridResult<&ObjectRecord> {
        self.objects.get(id).ok_or(GridError::ObjectNotFound(id))
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Create an object at `cell` and enter it into the grid.
    ///
    /// Infantry take the first free sub-position.  Buildings claim their
    /// whole footprint or nothing.
    pub fn spawn(&mut self, kind: ObjectKind, owner: HouseId, cell: CellId) -> GridResult<ObjectId> {
        self.grid.cell(cell)?;
        let mut record = ObjectRecord::new(kind, owner, cell);
        if kind == ObjectKind::Infantry {
            record.spot = Some(self.grid.free_spot(cell).ok_or(GridError::NoFreeSpot(cell))?);
        }

        let id = self.objects.insert(record.clone());
        if let Err(e) = self.place(id, &record) {
            self.objects.remove(id);
            return Err(e);
        }
        if kind == ObjectKind::Terrain {
            self.grid.recompute_zones();
        }
        debug!(object = %id, ?kind, cell = %cell, "spawned");
        Ok(id)
    }

    /// Take an object out of the grid and free its slot.
    pub fn remove(&mut self, id: ObjectId) -> GridResult<ObjectRecord> {
        let record = self.object(id)?.clone();
        self.grid.occupy_up(record.cell, id, record.footprint())?;
        if let ObjectKind::Building { width, height } = record.kind {
            for cell in self.building_cells(record.cell, width, height)?.into_iter().skip(1) {
                self.grid.overlap_up(cell, id, true)?;
            }
        }
        self.objects.remove(id);
        if record.kind == ObjectKind::Terrain {
            self.grid.recompute_zones();
        }
        debug!(object = %id, cell = %record.cell, "removed");
        Ok(record)
    }

    /// Move a mobile object from its current cell to `to`.
    ///
    /// Either both halves (leave the old chain, join the new one) happen or
    /// neither does.
    pub fn relocate(&mut self, id: ObjectId, to: CellId) -> GridResult<()> {
        let record = self.object(id)?.clone();
        if !record.kind.is_mobile() {
            return Err(GridError::NotMovable(id));
        }
        self.grid.cell(to)?;

        let spot = match record.kind {
            ObjectKind::Infantry => Some(self.grid.free_spot(to).ok_or(GridError::NoFreeSpot(to))?),
            _ => None,
        };
        let new_footprint = match spot {
            Some(spot) => Footprint::Infantry(spot),
            None       => record.footprint(),
        };

        let old_footprint = record.footprint();
        self.grid.occupy_up(record.cell, id, old_footprint)?;
        if let Err(e) = self.grid.occupy_down(to, id, new_footprint) {
            // Put it back where it was.
            self.grid.occupy_down(record.cell, id, old_footprint)?;
            return Err(e);
        }

        if let Some(r) = self.objects.get_mut(id) {
            r.cell = to;
            r.spot = spot;
        }
        trace!(object = %id, from = %record.cell, to = %to, "relocated");
        Ok(())
    }

    pub fn start_driver(&mut self, id: ObjectId) -> GridResult<()> {
        self.objects.get_mut(id).ok_or(GridError::ObjectNotFound(id))?.driving = true;
        Ok(())
    }

    pub fn stop_driver(&mut self, id: ObjectId) -> GridResult<()> {
        self.objects.get_mut(id).ok_or(GridError::ObjectNotFound(id))?.driving = false;
        Ok(())
    }

    // ── Derived state ─────────────────────────────────────────────────────

    /// Clear every chain, flag and overlap list and re-enter all objects in
    /// ascending id order, then relabel zones.
    pub fn rebuild_occupancy(&mut self) -> GridResult<()> {
        self.grid.clear_occupancy();
        let records: Vec<(ObjectId, ObjectRecord)> =
            self.objects.iter().map(|(id, r)| (id, r.clone())).collect();
        for (id, record) in &records {
            self.place(*id, record)?;
        }
        self.grid.recompute_zones();
        Ok(())
    }

    /// Check that every live object is in exactly one occupant chain, the
    /// one named by its record, and that no chain holds a dead handle.
    pub fn audit_occupancy(&self) -> GridResult<()> {
        let mut appearances: FxHashMap<ObjectId, usize> = FxHashMap::default();
        for (cell, c) in self.grid.iter() {
            for &object in c.occupants() {
                if !self.objects.contains(object) {
                    return Err(GridError::StaleHandle { cell, object });
                }
                *appearances.entry(object).or_default() += 1;
            }
            for &object in c.overlappers() {
                if !self.objects.contains(object) {
                    return Err(GridError::StaleHandle { cell, object });
                }
            }
        }

        for (object, record) in self.objects.iter() {
            let n = appearances.get(&object).copied().unwrap_or(0);
            if n != 1 {
                return Err(GridError::AuditFailed { object, appearances: n });
            }
            if !self.grid.cell(record.cell)?.occupants().contains(&object) {
                return Err(GridError::NotOccupying { object, cell: record.cell });
            }
        }
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn place(&mut self, id: ObjectId, record: &ObjectRecord) -> GridResult<()> {
        match record.kind {
            ObjectKind::Building { width, height } => {
                let cells = self.building_cells(record.cell, width, height)?;
                if let Some(&taken) = cells
                    .iter()
                    .find(|&&c| !self.grid.is_spot_free(c, Spot::Building))
                {
                    return Err(GridError::OccupancyConflict { cell: taken, spot: Spot::Building });
                }
                self.grid.occupy_down(record.cell, id, Footprint::Building)?;
                for &cell in &cells[1..] {
                    self.grid.overlap_down(cell, id, true)?;
                }
                Ok(())
            }
            _ => self.grid.occupy_down(record.cell, id, record.footprint()),
        }
    }

    /// Footprint cells of a building anchored at `anchor`, anchor first.
    fn building_cells(&self, anchor: CellId, width: u8, height: u8) -> GridResult<Vec<CellId>> {
        let origin = self.grid.coord(anchor);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for dy in 0..height.max(1) as i32 {
            for dx in 0..width.max(1) as i32 {
                let at = CellCoord::new(origin.x + dx, origin.y + dy);
                cells.push(self.grid.try_cell_id(at)?);
            }
        }
        Ok(cells)
    }
}
