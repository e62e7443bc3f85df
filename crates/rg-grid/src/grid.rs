//! The `Grid` — a fixed W×H array of cells addressed by linear cell number.

use rg_core::{CellCoord, CellId, Facing, Locomotion, ObjectId, ZoneKind};

use crate::cell::{Cell, Footprint, LandType, Overlay, Spot};
use crate::land::land_speed;
use crate::zone::flood_zones;
use crate::{GridError, GridResult};

/// Largest supported edge length.  Keeps `y * width + x` well inside `u32`.
const MAX_EDGE: u32 = 4_096;

/// Canonical spatial index.
///
/// Terrain edits go through [`set_land`][Self::set_land] /
/// [`set_overlay`][Self::set_overlay] (or their batch forms) so that zone
/// labels are recomputed every time passability can have changed.
#[derive(Clone, Debug)]
pub struct Grid {
    width:  u32,
    height: u32,
    cells:  Vec<Cell>,
}

impl Grid {
    /// An all-`Clear` grid.
    pub fn new(width: u32, height: u32) -> GridResult<Self> {
        if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::default(); (width * height) as usize],
        };
        grid.recompute_zones();
        Ok(grid)
    }

    /// Rebuild a grid from row-major `(land, overlay)` pairs, e.g. after
    /// loading a snapshot.  Occupancy starts empty; zones are recomputed.
    pub fn from_terrain(
        width:   u32,
        height:  u32,
        terrain: &[(LandType, Overlay)],
    ) -> GridResult<Self> {
        let mut grid = Self::new(width, height)?;
        if terrain.len() != grid.cells.len() {
            return Err(GridError::InvalidDimensions { width, height });
        }
        for (cell, &(land, overlay)) in grid.cells.iter_mut().zip(terrain) {
            cell.land = land;
            cell.overlay = overlay;
        }
        grid.recompute_zones();
        Ok(grid)
    }

    /// Row-major `(land, overlay)` pairs; the inverse of `from_terrain`.
    pub fn terrain(&self) -> Vec<(LandType, Overlay)> {
        self.cells.iter().map(|c| (c.land, c.overlay)).collect()
    }

    // ── Addressing ────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: CellId) -> bool {
        cell.index() < self.cells.len()
    }

    /// Cell number for an on-map coordinate.
    #[inline]
    pub fn cell_id(&self, at: CellCoord) -> Option<CellId> {
        if at.x < 0 || at.y < 0 || at.x as u32 >= self.width || at.y as u32 >= self.height {
            return None;
        }
        Some(CellId(at.y as u32 * self.width + at.x as u32))
    }

    /// Like [`cell_id`][Self::cell_id] but reporting the bad coordinate.
    pub fn try_cell_id(&self, at: CellCoord) -> GridResult<CellId> {
        self.cell_id(at).ok_or(GridError::CoordOutOfRange(at))
    }

    /// Coordinate of `cell`.  Only meaningful for on-map cells.
    #[inline]
    pub fn coord(&self, cell: CellId) -> CellCoord {
        debug_assert!(self.contains(cell), "{cell} is off the map");
        CellCoord::new((cell.0 % self.width) as i32, (cell.0 / self.width) as i32)
    }

    /// The neighbour of `cell` in direction `facing`, or `None` past the edge.
    #[inline]
    pub fn adjacent(&self, cell: CellId, facing: Facing) -> Option<CellId> {
        if !self.contains(cell) {
            return None;
        }
        self.cell_id(self.coord(cell).step(facing))
    }

    #[inline]
    pub fn get(&self, cell: CellId) -> Option<&Cell> {
        self.cells.get(cell.index())
    }

    pub fn cell(&self, cell: CellId) -> GridResult<&Cell> {
        self.cells.get(cell.index()).ok_or(GridError::CellOutOfRange(cell))
    }

    fn cell_mut(&mut self, cell: CellId) -> GridResult<&mut Cell> {
        self.cells.get_mut(cell.index()).ok_or(GridError::CellOutOfRange(cell))
    }

    /// All cells with their ids, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().map(|(i, c)| (CellId(i as u32), c))
    }

    // ── Terrain edits ─────────────────────────────────────────────────────

    pub fn set_land(&mut self, cell: CellId, land: LandType) -> GridResult<()> {
        self.cell_mut(cell)?.land = land;
        self.recompute_zones();
        Ok(())
    }

    pub fn set_overlay(&mut self, cell: CellId, overlay: Overlay) -> GridResult<()> {
        self.cell_mut(cell)?.overlay = overlay;
        self.recompute_zones();
        Ok(())
    }

    /// Apply many overlay edits with a single zone recomputation.  Nothing is
    /// changed if any cell is off the map.
    pub fn set_overlays<I>(&mut self, edits: I) -> GridResult<()>
    where
        I: IntoIterator<Item = (CellId, Overlay)>,
    {
        let edits: Vec<_> = edits.into_iter().collect();
        if let Some(&(bad, _)) = edits.iter().find(|(c, _)| !self.contains(*c)) {
            return Err(GridError::CellOutOfRange(bad));
        }
        for (cell, overlay) in edits {
            self.cells[cell.index()].overlay = overlay;
        }
        self.recompute_zones();
        Ok(())
    }

    /// Batch form of [`set_land`][Self::set_land].
    pub fn set_lands<I>(&mut self, edits: I) -> GridResult<()>
    where
        I: IntoIterator<Item = (CellId, LandType)>,
    {
        let edits: Vec<_> = edits.into_iter().collect();
        if let Some(&(bad, _)) = edits.iter().find(|(c, _)| !self.contains(*c)) {
            return Err(GridError::CellOutOfRange(bad));
        }
        for (cell, land) in edits {
            self.cells[cell.index()].land = land;
        }
        self.recompute_zones();
        Ok(())
    }

    /// Relabel every zone kind.  Called after any passability change.
    pub fn recompute_zones(&mut self) {
        for kind in ZoneKind::ALL {
            let clear: Vec<bool> = (0..self.cells.len())
                .map(|i| {
                    self.is_clear_to_move(CellId(i as u32), kind.flood_locomotion(), true, true, None, kind)
                })
                .collect();
            let labels = flood_zones(self.width, self.height, &clear);
            for (cell, label) in self.cells.iter_mut().zip(labels) {
                cell.zones[kind.index()] = label;
            }
        }
    }

    // ── Passability ───────────────────────────────────────────────────────

    /// Connectivity label of `cell` for `kind`; `0` for no zone or off-map.
    #[inline]
    pub fn zone(&self, cell: CellId, kind: ZoneKind) -> u16 {
        self.get(cell).map_or(0, |c| c.zone(kind))
    }

    /// Can a unit with `locomotion` stand in `cell` right now?
    ///
    /// `zone`, when given, must match the cell's label for `kind`.  Walls
    /// block unless `kind` is `Destroyer`, or `Crusher` and the wall is
    /// crushable; such walls count as clear land.  Off-map cells are never
    /// clear.
    pub fn is_clear_to_move(
        &self,
        cell:            CellId,
        locomotion:      Locomotion,
        ignore_infantry: bool,
        ignore_vehicles: bool,
        zone:            Option<u16>,
        kind:            ZoneKind,
    ) -> bool {
        let Some(c) = self.get(cell) else {
            return false;
        };
        if locomotion == Locomotion::Winged {
            return true;
        }
        if let Some(zone) = zone {
            if c.zone(kind) != zone {
                return false;
            }
        }
        if c.flags.blocking(ignore_infantry, ignore_vehicles) != 0 {
            return false;
        }

        let mut land = c.land_type();
        if c.overlay.is_wall() {
            let passable = match kind {
                ZoneKind::Destroyer => true,
                ZoneKind::Crusher   => c.overlay.is_crushable(),
                _                   => false,
            };
            if !passable {
                return false;
            }
            land = LandType::Clear;
        }
        land_speed(land, locomotion) != 0
    }

    // ── Occupancy ─────────────────────────────────────────────────────────

    /// Put `object` into the occupant chain of `cell` and set its footprint
    /// bit.  Buildings go to the back of the chain, everything else to the
    /// front.
    ///
    /// Fails without changing anything if the footprint bit is already set
    /// or the object is already in the chain.
    pub fn occupy_down(
        &mut self,
        cell:      CellId,
        object:    ObjectId,
        footprint: Footprint,
    ) -> GridResult<()> {
        let c = self.cell_mut(cell)?;
        if let Some(spot) = footprint.flag() {
            if c.flags.contains(spot) {
                return Err(GridError::OccupancyConflict { cell, spot });
            }
        }
        if c.occupants.contains(&object) {
            return Err(GridError::AlreadyOccupying { object, cell });
        }

        if let Some(spot) = footprint.flag() {
            c.flags.insert(spot);
        }
        if footprint == Footprint::Building {
            c.occupants.push(object);
        } else {
            c.occupants.insert(0, object);
        }
        Ok(())
    }

    /// Remove `object` from the occupant chain of `cell` and clear its
    /// footprint bit.
    pub fn occupy_up(
        &mut self,
        cell:      CellId,
        object:    ObjectId,
        footprint: Footprint,
    ) -> GridResult<()> {
        let c = self.cell_mut(cell)?;
        let Some(pos) = c.occupants.iter().position(|&o| o == object) else {
            return Err(GridError::NotOccupying { object, cell });
        };
        c.occupants.remove(pos);
        if let Some(spot) = footprint.flag() {
            c.flags.remove(spot);
        }
        Ok(())
    }

    /// Record that `object` spans into `cell`.  `blocking` also sets the
    /// building flag so coarse passability checks see the footprint.
    pub fn overlap_down(&mut self, cell: CellId, object: ObjectId, blocking: bool) -> GridResult<()> {
        let c = self.cell_mut(cell)?;
        if blocking && c.flags.contains(Spot::Building) {
            return Err(GridError::OccupancyConflict { cell, spot: Spot::Building });
        }
        if !c.overlappers.contains(&object) {
            c.overlappers.push(object);
        }
        if blocking {
            c.flags.insert(Spot::Building);
        }
        Ok(())
    }

    pub fn overlap_up(&mut self, cell: CellId, object: ObjectId, blocking: bool) -> GridResult<()> {
        let c = self.cell_mut(cell)?;
        c.overlappers.retain(|&o| o != object);
        if blocking {
            c.flags.remove(Spot::Building);
        }
        Ok(())
    }

    /// The object a renderer should report for `cell`: the front of the
    /// occupant chain.
    #[inline]
    pub fn cell_occupier(&self, cell: CellId) -> Option<ObjectId> {
        self.get(cell).and_then(|c| c.occupants.first().copied())
    }

    #[inline]
    pub fn overlappers(&self, cell: CellId) -> &[ObjectId] {
        self.get(cell).map_or(&[], |c| c.overlappers.as_slice())
    }

    #[inline]
    pub fn is_spot_free(&self, cell: CellId, spot: Spot) -> bool {
        self.get(cell).is_some_and(|c| !c.flags.contains(spot))
    }

    /// First free infantry sub-position, center first.
    pub fn free_spot(&self, cell: CellId) -> Option<Spot> {
        let c = self.get(cell)?;
        Spot::INFANTRY.into_iter().find(|&s| !c.flags.contains(s))
    }

    /// Nearest cell (by square rings) around `cell` that a unit could stand
    /// in, scanning each ring's top row, bottom row, left column, then right
    /// column.
    pub fn nearby_location(
        &self,
        cell:       CellId,
        locomotion: Locomotion,
        zone:       Option<u16>,
        kind:       ZoneKind,
    ) -> Option<CellId> {
        if !self.contains(cell) {
            return None;
        }
        let center = self.coord(cell);
        let max_radius = self.width.max(self.height) as i32;
        let clear = |x: i32, y: i32| {
            self.cell_id(CellCoord::new(x, y))
                .filter(|&c| self.is_clear_to_move(c, locomotion, false, false, zone, kind))
        };

        for r in 0..max_radius {
            let (top, bottom) = (center.y - r, center.y + r);
            let (left, right) = (center.x - r, center.x + r);
            for x in left..=right {
                if let Some(found) = clear(x, top) {
                    return Some(found);
                }
                if r > 0 {
                    if let Some(found) = clear(x, bottom) {
                        return Some(found);
                    }
                }
            }
            for y in (top + 1)..bottom {
                if let Some(found) = clear(left, y) {
                    return Some(found);
                }
                if let Some(found) = clear(right, y) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub(crate) fn clear_occupancy(&mut self) {
        for cell in &mut self.cells {
            cell.clear_occupancy();
        }
    }
}
