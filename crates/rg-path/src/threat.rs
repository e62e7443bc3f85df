//! Danger values consulted by threat-aware searches.

use rg_core::CellId;
use rg_grid::Grid;

/// Read-only per-cell danger.  Supplied by whatever tracks enemy weapons;
/// the pathfinder only compares it against a query's limit.
///
/// `Send + Sync` so one source can be shared by parallel planners.
pub trait ThreatSource: Send + Sync {
    fn danger(&self, cell: CellId) -> u32;
}

/// Everywhere is safe.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoThreat;

impl ThreatSource for NoThreat {
    #[inline]
    fn danger(&self, _cell: CellId) -> u32 {
        0
    }
}

/// Dense danger values, one per cell.  Cells past the end read as 0.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatMap {
    values: Vec<u32>,
}

impl ThreatMap {
    pub fn new(cells: usize) -> Self {
        Self { values: vec![0; cells] }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.len())
    }

    pub fn set(&mut self, cell: CellId, danger: u32) {
        if let Some(v) = self.values.get_mut(cell.index()) {
            *v = danger;
        }
    }

    /// Accumulate danger from another source covering `cell`.
    pub fn add(&mut self, cell: CellId, danger: u32) {
        if let Some(v) = self.values.get_mut(cell.index()) {
            *v = v.saturating_add(danger);
        }
    }

    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0);
    }
}

impl ThreatSource for ThreatMap {
    #[inline]
    fn danger(&self, cell: CellId) -> u32 {
        self.values.get(cell.index()).copied().unwrap_or(0)
    }
}
