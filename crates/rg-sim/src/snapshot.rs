//! Saved simulation state.
//!
//! Only the authoritative parts are stored: terrain, the object table and
//! the movers.  Occupant chains, overlap lists, occupancy bits and zone ids
//! are derived data and are rebuilt by
//! [`SimBuilder::from_snapshot`][crate::SimBuilder::from_snapshot].

use rg_core::{SimConfig, Tick};
use rg_grid::{LandType, ObjectTable, Overlay};
use rg_mover::Mover;
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub config:  SimConfig,
    /// The tick the restored run resumes at.
    pub tick:    Tick,
    pub width:   u32,
    pub height:  u32,
    /// Row-major `(land, overlay)` per cell.
    pub terrain: Vec<(LandType, Overlay)>,
    pub objects: ObjectTable,
    /// Movers in ascending object order.
    pub movers:  Vec<Mover>,
}

impl SimSnapshot {
    /// Cross-check the parts against each other before anything is rebuilt.
    pub fn validate(&self) -> SimResult<()> {
        let cells = self.width as usize * self.height as usize;
        if self.terrain.len() != cells {
            return Err(SimError::SnapshotMismatch(format!(
                "{} terrain entries for a {}x{} grid",
                self.terrain.len(),
                self.width,
                self.height
            )));
        }
        for mover in &self.movers {
            let Some(record) = self.objects.get(mover.object) else {
                return Err(SimError::SnapshotMismatch(format!("mover for missing {}", mover.object)));
            };
            if !record.kind.is_mobile() {
                return Err(SimError::SnapshotMismatch(format!("mover for immobile {}", mover.object)));
            }
        }
        Ok(())
    }
}
