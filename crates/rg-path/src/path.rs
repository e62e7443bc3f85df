//! Search output.

use rg_core::{CellId, Facing};
use rg_grid::Grid;

/// A route as an ordered list of compass facings from `start` to `end`.
///
/// `cost` is the sum of the `MoveType` costs of every cell entered.  A route
/// longer than the search buffer comes back as its first segment with
/// `complete == false`; `end` is then where the segment stops, not the
/// destination.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub start:    CellId,
    pub end:      CellId,
    pub facings:  Vec<Facing>,
    pub cost:     u32,
    /// `end` is the requested destination.
    pub complete: bool,
}

impl Path {
    /// Zero-length path for `start == dest`.
    pub fn empty(at: CellId) -> Self {
        Self { start: at, end: at, facings: Vec::new(), cost: 0, complete: true }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.facings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.facings.is_empty()
    }

    /// Cells entered, in order (the start cell is not included).  Stops early
    /// if a facing would leave the map.
    pub fn cells(&self, grid: &Grid) -> Vec<CellId> {
        let mut at = self.start;
        let mut out = Vec::with_capacity(self.facings.len());
        for &facing in &self.facings {
            let Some(next) = grid.adjacent(at, facing) else {
                break;
            };
            out.push(next);
            at = next;
        }
        out
    }
}
