//! Notifications a mover raises for the mission layer.

use rg_core::{CellId, ObjectId};
use rg_path::PathError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoverEvent {
    /// Took one step.
    Moved { object: ObjectId, from: CellId, to: CellId },

    /// Reached its target, or gave up close enough to it.
    Arrived { object: ObjectId, cell: CellId, close_enough: bool },

    /// A route request failed; the mover is now waiting to retry.
    PathFailed { object: ObjectId, error: PathError, retries_left: u32 },

    /// The next cell on the route turned out to be occupied or impassable.
    StepBlocked { object: ObjectId, cell: CellId },

    /// Out of retries.  The order is dropped and the mover is idle.
    UnableToComply { object: ObjectId },

    /// A deploy countdown finished.
    Deployed { object: ObjectId },
}

impl MoverEvent {
    pub fn object(&self) -> ObjectId {
        match self {
            MoverEvent::Moved { object, .. }
            | MoverEvent::Arrived { object, .. }
            | MoverEvent::PathFailed { object, .. }
            | MoverEvent::StepBlocked { object, .. }
            | MoverEvent::UnableToComply { object }
            | MoverEvent::Deployed { object } => *object,
        }
    }
}
