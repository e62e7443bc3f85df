//! Per-unit drive state.

use std::collections::VecDeque;

use rg_core::{CellId, Facing, ObjectId};
use rg_path::MoveProfile;

/// Where a mover is in its drive cycle.
///
/// ```text
///   Idle ──assign──▶ PathPending ──found──▶ Driving ──arrived──▶ Idle
///                       ▲   │                 │  │
///                       │   └──failed──▶ Blocked ◀─step blocked
///                       │               (countdown)   │
///                       └──────window ran dry─────────┘
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriveState {
    #[default]
    Idle,
    /// Has a destination, needs a route this tick.
    PathPending,
    /// Following the path window, one cell per tick.
    Driving,
    /// Waiting `countdown` ticks before asking for a route again.
    Blocked { countdown: u32 },
    /// Timed deploy action; refuses orders until it finishes.
    Deploying { countdown: u32 },
}

/// Movement state for one mobile object.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mover {
    pub object:       ObjectId,
    pub profile:      MoveProfile,
    pub state:        DriveState,

    /// Destination as ordered.
    pub destination:  Option<CellId>,
    /// Cell actually routed to.  Differs from `destination` when the ordered
    /// cell was impassable and a nearby one was substituted.
    pub target:       Option<CellId>,

    /// The next facings of the current route, at most `path_window` long.
    pub window:       VecDeque<Facing>,
    /// Failed attempts left before giving up.  Refilled by every step taken.
    pub retries_left: u32,
    /// Cell the unit is heading into while driving.
    pub head_to:      Option<CellId>,
    /// When set, routes avoid cells whose danger exceeds this.
    pub danger_limit: Option<u32>,
}

impl Mover {
    pub fn new(object: ObjectId, profile: MoveProfile) -> Self {
        Self {
            object,
            profile,
            state:        DriveState::Idle,
            destination:  None,
            target:       None,
            window:       VecDeque::new(),
            retries_left: 0,
            head_to:      None,
            danger_limit: None,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.state == DriveState::Idle
    }

    /// Does this mover want a route computed on the coming tick?
    pub fn needs_path(&self) -> bool {
        match self.state {
            DriveState::PathPending => true,
            DriveState::Blocked { countdown } => countdown == 0,
            DriveState::Driving => self.window.is_empty(),
            DriveState::Idle | DriveState::Deploying { .. } => false,
        }
    }

    /// Drop everything about the current order.
    pub(crate) fn clear_order(&mut self) {
        self.destination = None;
        self.target = None;
        self.window.clear();
        self.head_to = None;
    }
}
