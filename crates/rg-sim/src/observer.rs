//! Simulation observer trait for progress reporting and data collection.

use rg_core::Tick;
use rg_grid::World;
use rg_mover::{MoverEvent, MoverStore};

/// Counts for one tick, handed to [`SimObserver::on_tick_end`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickSummary {
    pub tick:          Tick,
    /// Movers that asked the pathfinder for a route.
    pub planned:       usize,
    pub moved:         usize,
    pub arrived:       usize,
    pub path_failures: usize,
    pub step_blocked:  usize,
    pub gave_up:       usize,
    /// Movers still holding an order after the tick.
    pub busy:          usize,
}

impl TickSummary {
    pub(crate) fn new(tick: Tick) -> Self {
        Self { tick, ..Self::default() }
    }

    pub(crate) fn count(&mut self, event: &MoverEvent) {
        match event {
            MoverEvent::Moved { .. }          => self.moved += 1,
            MoverEvent::Arrived { .. }        => self.arrived += 1,
            MoverEvent::PathFailed { .. }     => self.path_failures += 1,
            MoverEvent::StepBlocked { .. }    => self.step_blocked += 1,
            MoverEvent::UnableToComply { .. } => self.gave_up += 1,
            MoverEvent::Deployed { .. }       => {}
        }
    }
}

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl SimObserver for Arrivals {
///     fn on_mover_event(&mut self, _tick: Tick, event: &MoverEvent, _world: &World) {
///         if matches!(event, MoverEvent::Arrived { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per mover event, in the order the apply phase raised
    /// them.  `world` is the state at the end of the tick.
    fn on_mover_event(&mut self, _tick: Tick, _event: &MoverEvent, _world: &World) {}

    /// Called at the end of each tick, after every event has been reported.
    fn on_tick_end(&mut self, _tick: Tick, _summary: &TickSummary) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    fn on_snapshot(&mut self, _tick: Tick, _world: &World, _movers: &MoverStore) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
