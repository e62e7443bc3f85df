//! Fluent builder for constructing a [`Sim`].

use rg_core::{CellId, ObjectId, SimConfig, Tick};
use rg_grid::{Grid, World};
use rg_mover::{Mover, MoverEngine};
use rg_path::{NoThreat, Pathfinder, ThreatSource};
use tracing::debug;

use crate::{Sim, SimError, SimResult, SimSnapshot};

/// Fluent builder for [`Sim<P, T>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, path limits, drive rules
/// - [`World`] — the grid with its objects already placed
/// - `P: Pathfinder` — the search (e.g. [`rg_path::EdgeFollower`])
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                        |
/// |-----------------|------------------------------------------------|
/// | `.threat(t)`    | [`NoThreat`]                                   |
/// | `.orders(v)`    | none; every mover starts idle                  |
///
/// Every mobile object in the world gets a mover with its kind's default
/// profile, unless the builder came from a snapshot, which carries its own.
///
/// # Example
///
/// ```rust,ignore
/// let pathfinder = EdgeFollower::new(config.path.clone());
/// let mut sim = SimBuilder::new(config, world, pathfinder)
///     .orders(vec![(tank, dest)])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: Pathfinder, T: ThreatSource = NoThreat> {
    config:     SimConfig,
    world:      World,
    pathfinder: P,
    threat:     T,
    movers:     Option<Vec<Mover>>,
    orders:     Vec<(ObjectId, CellId)>,
    start_tick: Tick,
}

impl<P: Pathfinder> SimBuilder<P, NoThreat> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, world: World, pathfinder: P) -> Self {
        Self {
            config,
            world,
            pathfinder,
            threat:     NoThreat,
            movers:     None,
            orders:     Vec::new(),
            start_tick: Tick::ZERO,
        }
    }

    /// Resume from a saved snapshot.  Terrain zones and occupancy are
    /// rebuilt; movers and the clock continue where they were.
    pub fn from_snapshot(snapshot: SimSnapshot, pathfinder: P) -> SimResult<Self> {
        snapshot.validate()?;
        let grid = Grid::from_terrain(snapshot.width, snapshot.height, &snapshot.terrain)?;
        let world = World::from_parts(grid, snapshot.objects)?;
        Ok(Self {
            config:     snapshot.config,
            world,
            pathfinder,
            threat:     NoThreat,
            movers:     Some(snapshot.movers),
            orders:     Vec::new(),
            start_tick: snapshot.tick,
        })
    }
}

impl<P: Pathfinder, T: ThreatSource> SimBuilder<P, T> {
    /// Supply the danger source used by movers with a danger limit.
    pub fn threat<U: ThreatSource>(self, threat: U) -> SimBuilder<P, U> {
        SimBuilder {
            config:     self.config,
            world:      self.world,
            pathfinder: self.pathfinder,
            threat,
            movers:     self.movers,
            orders:     self.orders,
            start_tick: self.start_tick,
        }
    }

    /// Destinations to assign before the first tick.
    pub fn orders(mut self, orders: Vec<(ObjectId, CellId)>) -> Self {
        self.orders = orders;
        self
    }

    /// Validate inputs, register movers, and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<P, T>> {
        self.config.validate().map_err(SimError::Config)?;
        self.world.audit_occupancy()?;

        let mut movers = MoverEngine::new(self.pathfinder, self.config.drive.clone());
        match self.movers {
            Some(saved) => movers.store = saved.into_iter().collect(),
            None => {
                let mobile: Vec<ObjectId> = self
                    .world
                    .objects
                    .iter()
                    .filter(|(_, record)| record.kind.is_mobile())
                    .map(|(id, _)| id)
                    .collect();
                for id in mobile {
                    movers.register(&self.world, id)?;
                }
            }
        }
        for (object, dest) in self.orders {
            movers.assign_destination(&self.world, object, dest)?;
        }
        debug!(
            movers = movers.store.len(),
            cells  = self.world.grid.len(),
            start  = %self.start_tick,
            "sim built"
        );

        let mut clock = self.config.make_clock();
        clock.current_tick = self.start_tick;
        Ok(Sim {
            clock,
            config: self.config,
            world:  self.world,
            movers,
            threat: self.threat,
        })
    }
}
