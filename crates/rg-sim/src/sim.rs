//! The `Sim` struct and its tick loop.

use rg_core::{CellId, ObjectId, SimClock, SimConfig, Tick};
use rg_grid::World;
use rg_mover::{MoverEngine, MoverEvent, Planned};
use rg_path::{NoThreat, Pathfinder, ThreatSource};
use tracing::info;

use crate::{SimObserver, SimResult, SimSnapshot, TickSummary};

/// The main simulation runner.
///
/// `Sim<P, T>` owns the world and every mover and drives the two-phase tick:
///
/// 1. **Plan phase** (optionally parallel with the `parallel` feature): each
///    mover that needs a route computes one against the start-of-tick world.
/// 2. **Apply phase** (sequential, ascending `ObjectId`): plans are taken,
///    one step is driven, countdowns advance, events are raised.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Pathfinder, T: ThreatSource = NoThreat> {
    /// Global configuration (total ticks, seed, path limits, drive rules).
    pub config: SimConfig,

    /// Simulation clock.
    pub clock: SimClock,

    /// Grid and object table.
    pub world: World,

    /// Pathfinder plus every registered mover.
    pub movers: MoverEngine<P>,

    /// Danger values consulted by movers that have a danger limit.
    pub threat: T,
}

impl<P: Pathfinder, T: ThreatSource> Sim<P, T> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        info!(
            from    = %self.clock.current_tick,
            to      = %self.config.end_tick(),
            movers  = self.movers.store.len(),
            "simulation started"
        );
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        info!(clock = %self.clock, busy = self.movers.store.busy_count(), "simulation finished");
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    /// Order `object` to `dest`.  Takes effect on the next tick.
    pub fn assign_destination(&mut self, object: ObjectId, dest: CellId) -> SimResult<()> {
        self.movers.assign_destination(&self.world, object, dest)?;
        Ok(())
    }

    /// Capture everything needed to resume this run.
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            config:  self.config.clone(),
            tick:    self.clock.current_tick,
            width:   self.world.grid.width(),
            height:  self.world.grid.height(),
            terrain: self.world.grid.terrain(),
            objects: self.world.objects.clone(),
            movers:  self.movers.store.iter().cloned().collect(),
        }
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        let (summary, events) = self.process_tick(now);
        for event in &events {
            observer.on_mover_event(now, event, &self.world);
        }
        observer.on_tick_end(now, &summary);

        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.world, &self.movers.store);
        }
        self.clock.advance();
    }

    fn process_tick(&mut self, now: Tick) -> (TickSummary, Vec<MoverEvent>) {
        let ids = self.movers.store.ids();

        // ── Phase 1: plan against the start-of-tick world ─────────────────
        let plans = self.compute_plans(&ids);
        let mut summary = TickSummary::new(now);
        summary.planned = plans.iter().filter(|p| p.is_some()).count();

        // ── Phase 2: apply in ascending ObjectId order ────────────────────
        let mut events = Vec::new();
        for (id, plan) in ids.into_iter().zip(plans) {
            self.movers.apply(&mut self.world, id, plan, &mut events);
        }

        for event in &events {
            summary.count(event);
        }
        summary.busy = self.movers.store.busy_count();
        (summary, events)
    }

    /// Route every mover that needs one.  With the `parallel` Cargo feature
    /// the searches run on Rayon's thread pool.
    fn compute_plans(&self, ids: &[ObjectId]) -> Vec<Option<Planned>> {
        // Explicit field borrows so the closures capture only shared data.
        let engine = &self.movers;
        let world = &self.world;
        let threat: &dyn ThreatSource = &self.threat;

        #[cfg(not(feature = "parallel"))]
        {
            ids.iter().map(|&id| engine.plan(world, threat, id)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            ids.par_iter().map(|&id| engine.plan(world, threat, id)).collect()
        }
    }
}
