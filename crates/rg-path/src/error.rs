//! Pathfinder error type.

use std::fmt;

use thiserror::Error;

use rg_core::CellId;

/// Why a search ended without a route.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NotFoundReason {
    /// Origin and destination are in different zones (or the origin is in
    /// none).
    Unreachable,
    /// The destination cell is impassable at the requested threshold.
    DestinationBlocked,
    /// Edge following failed in both senses.
    NoRoute,
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotFoundReason::Unreachable        => "unreachable",
            NotFoundReason::DestinationBlocked => "destination blocked",
            NotFoundReason::NoRoute            => "no route",
        };
        f.write_str(s)
    }
}

/// Errors produced by `rg-path`.  A failed search never yields a partial
/// path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("no path from {from} to {to}: {reason}")]
    NotFound { from: CellId, to: CellId, reason: NotFoundReason },

    #[error("detour needs more than {limit} steps")]
    LengthExceeded { limit: usize },

    #[error("search gave up after {budget} cell visits")]
    VisitBudgetExhausted { budget: usize },

    #[error("cell {0} is outside the map")]
    CellOutOfRange(CellId),
}

impl PathError {
    #[inline]
    pub fn reason(&self) -> Option<NotFoundReason> {
        match self {
            PathError::NotFound { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

pub type PathResult<T> = Result<T, PathError>;
