//! Grid-subsystem error type.

use thiserror::Error;

use rg_core::{CellCoord, CellId, ObjectId};

use crate::Spot;

/// Errors produced by `rg-grid`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("cell {0} is outside the map")]
    CellOutOfRange(CellId),

    #[error("coordinate {0} is outside the map")]
    CoordOutOfRange(CellCoord),

    #[error("grid dimensions {width}x{height} are not usable")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("sub-position {spot:?} of {cell} is already taken")]
    OccupancyConflict { cell: CellId, spot: Spot },

    #[error("{0} has no free infantry sub-position")]
    NoFreeSpot(CellId),

    #[error("{object} is already in the occupant chain of {cell}")]
    AlreadyOccupying { object: ObjectId, cell: CellId },

    #[error("{object} is not in the occupant chain of {cell}")]
    NotOccupying { object: ObjectId, cell: CellId },

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("object {0} cannot move")]
    NotMovable(ObjectId),

    #[error("occupancy audit: {object} appears in {appearances} occupant chains")]
    AuditFailed { object: ObjectId, appearances: usize },

    #[error("occupancy audit: {cell} holds stale handle {object}")]
    StaleHandle { cell: CellId, object: ObjectId },
}

pub type GridResult<T> = Result<T, GridError>;
