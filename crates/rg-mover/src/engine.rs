//! The mover engine: route planning and per-tick stepping for every unit.

use rg_core::{CellId, Coord, DriveRules, Locomotion, MoveType, ObjectId};
use rg_grid::World;
use rg_path::{
    can_enter, MoveProfile, NotFoundReason, Path, PathError, PathQuery, Pathfinder, ThreatSource,
};
use tracing::{debug, trace, warn};

use crate::{DriveState, Mover, MoverError, MoverEvent, MoverResult, MoverStore};

/// The outcome of planning one mover against a read-only world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Planned {
    /// The cell routed to (the ordered destination or a substitute).
    pub target: CellId,
    pub result: Result<Path, PathError>,
}

/// Wraps a [`Pathfinder`] and a [`MoverStore`].
///
/// Each tick is split in two.  [`plan`][Self::plan] is read-only and may run
/// for many movers at once; [`apply`][Self::apply] consumes a plan and
/// mutates the world, and must be called in ascending `ObjectId` order.
///
/// # Type parameter
///
/// `P` is the search, e.g. [`rg_path::EdgeFollower`].
pub struct MoverEngine<P: Pathfinder> {
    pub pathfinder: P,
    pub store:      MoverStore,
    pub rules:      DriveRules,
}

impl<P: Pathfinder> MoverEngine<P> {
    pub fn new(pathfinder: P, rules: DriveRules) -> Self {
        Self { pathfinder, store: MoverStore::new(), rules }
    }

    // ── Orders ────────────────────────────────────────────────────────────

    /// Give `object` a mover with its kind's default profile.
    pub fn register(&mut self, world: &World, object: ObjectId) -> MoverResult<()> {
        let profile = MoveProfile::for_object(world, object)?;
        self.register_with(object, profile);
        Ok(())
    }

    /// Give `object` a mover with an explicit profile.
    pub fn register_with(&mut self, object: ObjectId, profile: MoveProfile) {
        self.store.insert(Mover::new(object, MoveProfile { object, ..profile }));
    }

    pub fn unregister(&mut self, world: &mut World, object: ObjectId) -> Option<Mover> {
        let mover = self.store.remove(object)?;
        // A destroyed object has no flag left to clear.
        if world.objects.contains(object) {
            let stopped = world.stop_driver(object);
            debug_assert!(stopped.is_ok());
        }
        Some(mover)
    }

    fn mover_mut(&mut self, object: ObjectId) -> MoverResult<&mut Mover> {
        self.store.get_mut(object).ok_or(MoverError::NotRegistered(object))
    }

    /// Send `object` to `dest`.  Replaces any current order.
    pub fn assign_destination(&mut self, world: &World, object: ObjectId, dest: CellId) -> MoverResult<()> {
        world.grid.cell(dest)?;
        let retry_limit = self.rules.retry_limit;
        let mover = self.mover_mut(object)?;
        if let DriveState::Deploying { .. } = mover.state {
            return Err(MoverError::Deploying(object));
        }
        mover.clear_order();
        mover.destination = Some(dest);
        mover.retries_left = retry_limit;
        mover.state = DriveState::PathPending;
        debug!(object = %object, dest = %dest, "destination assigned");
        Ok(())
    }

    /// Route around cells whose danger is above `limit` (or stop doing so).
    pub fn set_danger_limit(&mut self, object: ObjectId, limit: Option<u32>) -> MoverResult<()> {
        self.mover_mut(object)?.danger_limit = limit;
        Ok(())
    }

    /// Drop the current order and go idle where the unit stands.
    pub fn stop(&mut self, world: &mut World, object: ObjectId) -> MoverResult<()> {
        let mover = self.mover_mut(object)?;
        mover.clear_order();
        mover.state = DriveState::Idle;
        world.stop_driver(object)?;
        Ok(())
    }

    /// Start a timed deploy.  Only an idle mover can deploy.
    pub fn deploy(&mut self, object: ObjectId, ticks: u32) -> MoverResult<()> {
        let mover = self.mover_mut(object)?;
        if !mover.is_idle() {
            return Err(MoverError::Busy(object));
        }
        mover.state = DriveState::Deploying { countdown: ticks };
        debug!(object = %object, ticks, "deploying");
        Ok(())
    }

    /// Mark `object` as driving toward `cell`.  Allies rank a driving unit
    /// as a moving block rather than a parked one.
    pub fn start_driver(&mut self, world: &mut World, object: ObjectId, cell: CellId) -> MoverResult<()> {
        self.mover_mut(object)?.head_to = Some(cell);
        world.start_driver(object)?;
        Ok(())
    }

    pub fn stop_driver(&mut self, world: &mut World, object: ObjectId) -> MoverResult<()> {
        self.mover_mut(object)?.head_to = None;
        world.stop_driver(object)?;
        Ok(())
    }

    /// Lepton center of the cell `object` is heading into, or of its own cell
    /// when it is not driving.
    pub fn head_to_coord(&self, world: &World, object: ObjectId) -> MoverResult<Coord> {
        let mover = self.store.get(object).ok_or(MoverError::NotRegistered(object))?;
        let record = world.object(object)?;
        let cell = if record.driving { mover.head_to.unwrap_or(record.cell) } else { record.cell };
        Ok(Coord::cell_center(world.grid.coord(cell)))
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Plan then apply every mover, ascending by id.  All plans see the
    /// world as it was at the start of the tick.
    pub fn tick(&mut self, world: &mut World, threat: &dyn ThreatSource) -> Vec<MoverEvent> {
        let ids = self.store.ids();
        let plans: Vec<Option<Planned>> = ids.iter().map(|&id| self.plan(world, threat, id)).collect();
        let mut events = Vec::new();
        for (id, plan) in ids.into_iter().zip(plans) {
            self.apply(world, id, plan, &mut events);
        }
        events
    }

    /// Compute a route for `object` if it needs one.  Never mutates.
    ///
    /// Thresholds are tried cheapest first up to `max_threshold`.  A
    /// destination the unit could never enter is swapped for the nearest
    /// cell it can.
    pub fn plan(&self, world: &World, threat: &dyn ThreatSource, object: ObjectId) -> Option<Planned> {
        let mover = self.store.get(object)?;
        if !mover.needs_path() {
            return None;
        }
        let dest = mover.destination?;
        let here = world.objects.get(object)?.cell;
        let profile = mover.profile;

        let target = if can_enter(world, &profile, dest) == MoveType::No {
            let zone = (profile.locomotion != Locomotion::Winged)
                .then(|| world.grid.zone(here, profile.zone_kind));
            world
                .grid
                .nearby_location(dest, profile.locomotion, zone, profile.zone_kind)
                .unwrap_or(dest)
        } else {
            dest
        };

        let mut last = None;
        for threshold in MoveType::ladder_to(self.rules.max_threshold) {
            let mut query = PathQuery::new(here, target, profile).with_threshold(threshold);
            if let Some(limit) = mover.danger_limit {
                query = query.with_danger(limit, threat);
            }
            match self.pathfinder.find_path(world, &query) {
                Ok(path) => return Some(Planned { target, result: Ok(path) }),
                Err(e) => {
                    // No threshold changes which zone a cell is in.
                    let hopeless = e.reason() == Some(NotFoundReason::Unreachable)
                        || matches!(e, PathError::CellOutOfRange(_));
                    last = Some(e);
                    if hopeless {
                        break;
                    }
                }
            }
        }
        last.map(|e| Planned { target, result: Err(e) })
    }

    /// Advance `object` by one tick using `plan` (from [`plan`][Self::plan]
    /// on this tick's start-of-tick world).
    pub fn apply(
        &mut self,
        world:  &mut World,
        object: ObjectId,
        plan:   Option<Planned>,
        events: &mut Vec<MoverEvent>,
    ) {
        if !world.objects.contains(object) {
            // The unit was destroyed; its mover goes with it.
            self.store.remove(object);
            return;
        }
        let rules = self.rules.clone();
        let Some(mover) = self.store.get_mut(object) else {
            return;
        };

        match mover.state {
            DriveState::Idle => return,
            DriveState::Deploying { countdown } => {
                if countdown <= 1 {
                    mover.state = DriveState::Idle;
                    events.push(MoverEvent::Deployed { object });
                } else {
                    mover.state = DriveState::Deploying { countdown: countdown - 1 };
                }
                return;
            }
            DriveState::Blocked { countdown } if countdown > 0 => {
                mover.state = DriveState::Blocked { countdown: countdown - 1 };
                return;
            }
            _ => {}
        }

        if let Some(planned) = plan {
            take_plan(world, mover, &rules, planned, events);
        }
        if mover.state == DriveState::Driving {
            drive_step(world, mover, &rules, events);
        }
    }
}

// ── Transitions ───────────────────────────────────────────────────────────────

fn take_plan(
    world:   &mut World,
    mover:   &mut Mover,
    rules:   &DriveRules,
    planned: Planned,
    events:  &mut Vec<MoverEvent>,
) {
    let object = mover.object;
    match planned.result {
        Ok(path) => {
            mover.target = Some(planned.target);
            mover.window = path.facings.iter().copied().take(rules.path_window).collect();
            mover.state = DriveState::Driving;
            let started = world.start_driver(object);
            debug_assert!(started.is_ok(), "{object} vanished mid-tick");
            debug!(
                object = %object, steps = path.len(), kept = mover.window.len(),
                complete = path.complete, "driving"
            );
        }
        Err(error) => {
            let Some(dest) = mover.destination else {
                mover.state = DriveState::Idle;
                return;
            };
            let Ok(record) = world.object(object) else {
                return;
            };
            let here = record.cell;
            let gap = world.grid.coord(here).chebyshev(world.grid.coord(dest));
            if gap <= rules.close_enough {
                arrive(world, mover, here, true, events);
                return;
            }
            mover.window.clear();
            fail_attempt(world, mover, rules.retry_delay_ticks, events, |retries_left| {
                MoverEvent::PathFailed { object, error, retries_left }
            });
        }
    }
}

/// Take the next step of the window, or finish.
fn drive_step(world: &mut World, mover: &mut Mover, rules: &DriveRules, events: &mut Vec<MoverEvent>) {
    let object = mover.object;
    let Ok(record) = world.object(object) else {
        return;
    };
    let here = record.cell;
    let target = mover.target.or(mover.destination).unwrap_or(here);
    if here == target {
        arrive(world, mover, here, false, events);
        return;
    }
    let Some(&facing) = mover.window.front() else {
        mover.state = DriveState::PathPending;
        return;
    };

    let next = match world.grid.adjacent(here, facing) {
        Some(next) if can_enter(world, &mover.profile, next) == MoveType::Ok => next,
        other => {
            step_blocked(world, mover, other.unwrap_or(here), events);
            return;
        }
    };
    mover.head_to = Some(next);
    if let Err(e) = world.relocate(object, next) {
        trace!(object = %object, cell = %next, error = %e, "relocate refused");
        step_blocked(world, mover, next, events);
        return;
    }

    mover.window.pop_front();
    mover.retries_left = rules.retry_limit;
    events.push(MoverEvent::Moved { object, from: here, to: next });
    trace!(object = %object, from = %here, to = %next, "moved");

    if next == target {
        arrive(world, mover, next, false, events);
    } else if let Some(&upcoming) = mover.window.front() {
        mover.head_to = world.grid.adjacent(next, upcoming);
    } else {
        // Window used up short of the target: replan next tick.
        mover.state = DriveState::PathPending;
    }
}

/// The route went stale under the unit.  Replan on the next tick.
fn step_blocked(world: &mut World, mover: &mut Mover, cell: CellId, events: &mut Vec<MoverEvent>) {
    let object = mover.object;
    trace!(object = %object, cell = %cell, "step blocked");
    mover.window.clear();
    mover.head_to = None;
    fail_attempt(world, mover, 0, events, |_| MoverEvent::StepBlocked { object, cell });
}

/// Spend one retry.  Out of retries → give up; otherwise wait `delay` ticks.
fn fail_attempt(
    world:  &mut World,
    mover:  &mut Mover,
    delay:  u32,
    events: &mut Vec<MoverEvent>,
    event:  impl FnOnce(u32) -> MoverEvent,
) {
    let object = mover.object;
    mover.retries_left = mover.retries_left.saturating_sub(1);
    events.push(event(mover.retries_left));
    let stopped = world.stop_driver(object);
    debug_assert!(stopped.is_ok(), "{object} vanished mid-tick");

    if mover.retries_left == 0 {
        warn!(object = %object, dest = ?mover.destination, "unable to comply");
        mover.clear_order();
        mover.state = DriveState::Idle;
        events.push(MoverEvent::UnableToComply { object });
    } else {
        mover.state = DriveState::Blocked { countdown: delay };
        debug!(object = %object, delay, retries_left = mover.retries_left, "blocked");
    }
}

fn arrive(world: &mut World, mover: &mut Mover, cell: CellId, close_enough: bool, events: &mut Vec<MoverEvent>) {
    let object = mover.object;
    mover.clear_order();
    mover.state = DriveState::Idle;
    let stopped = world.stop_driver(object);
    debug_assert!(stopped.is_ok(), "{object} vanished mid-tick");
    events.push(MoverEvent::Arrived { object, cell, close_enough });
    debug!(object = %object, cell = %cell, close_enough, "arrived");
}
