//! Pathfinder trait and the default edge-following implementation.
//!
//! # Pluggability
//!
//! The mover calls routing through the [`Pathfinder`] trait only, so a
//! different search can be dropped in without touching the movement state
//! machine.  [`EdgeFollower`] is the stock implementation.

use rg_core::{CellId, MoveType, PathLimits};
use rg_grid::World;
use tracing::debug;

use crate::passage::MoveProfile;
use crate::search::Search;
use crate::threat::{NoThreat, ThreatSource};
use crate::{Path, PathResult};

// ── PathQuery ─────────────────────────────────────────────────────────────────

/// One path request.
#[derive(Copy, Clone)]
pub struct PathQuery<'a> {
    pub start:     CellId,
    pub dest:      CellId,
    pub profile:   MoveProfile,
    /// Highest `MoveType` a cell may have and still be used.
    pub threshold: MoveType,
    /// When set, cells whose danger exceeds this are impassable.
    pub danger:    Option<u32>,
    pub threat:    &'a dyn ThreatSource,
}

impl<'a> PathQuery<'a> {
    /// Clear cells only, no threat filtering.
    pub fn new(start: CellId, dest: CellId, profile: MoveProfile) -> Self {
        Self { start, dest, profile, threshold: MoveType::Ok, danger: None, threat: &NoThreat }
    }

    pub fn with_threshold(mut self, threshold: MoveType) -> Self {
        self.threshold = threshold;
        self
    }

    /// Avoid cells whose danger from `threat` is above `limit`.
    pub fn with_danger(mut self, limit: u32, threat: &'a dyn ThreatSource) -> Self {
        self.danger = Some(limit);
        self.threat = threat;
        self
    }
}

impl std::fmt::Debug for PathQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathQuery")
            .field("start", &self.start)
            .field("dest", &self.dest)
            .field("profile", &self.profile)
            .field("threshold", &self.threshold)
            .field("danger", &self.danger)
            .finish_non_exhaustive()
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable grid search.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`; the tick driver may plan many
/// movers at once on Rayon workers against the same read-only `World`.
pub trait Pathfinder: Send + Sync {
    /// Route from `query.start` to `query.dest`, or say why not.  Identical
    /// world and query must always give identical output.
    fn find_path(&self, world: &World, query: &PathQuery<'_>) -> PathResult<Path>;
}

// ── EdgeFollower ──────────────────────────────────────────────────────────────

/// Greedy walk toward the destination, tracing obstacle edges in both
/// rotational senses when blocked, with loop cutting and a final smoothing
/// pass.  Bounded by [`PathLimits`].
#[derive(Clone, Debug, Default)]
pub struct EdgeFollower {
    limits: PathLimits,
}

impl EdgeFollower {
    pub fn new(limits: PathLimits) -> Self {
        Self { limits }
    }

    #[inline]
    pub fn limits(&self) -> &PathLimits {
        &self.limits
    }
}

impl Pathfinder for EdgeFollower {
    fn find_path(&self, world: &World, query: &PathQuery<'_>) -> PathResult<Path> {
        let mut search = Search::new(world, query, &self.limits);
        let result = search.route();
        match &result {
            Ok(path) => debug!(
                object = %query.profile.object, from = %query.start, to = %query.dest,
                steps = path.len(), cost = path.cost, complete = path.complete,
                threshold = %query.threshold, visits = search.visits(),
                "path found"
            ),
            Err(e) => debug!(
                object = %query.profile.object, from = %query.start, to = %query.dest,
                threshold = %query.threshold, visits = search.visits(),
                unravels = search.unravels(), error = %e,
                "path failed"
            ),
        }
        result
    }
}
