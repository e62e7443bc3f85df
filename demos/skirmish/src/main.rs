//! skirmish — two armies cross a river-split map.
//!
//! Loads `SimConfig` and the `[scenario]` table from a TOML file (default
//! `demos/skirmish/skirmish.toml`), generates the map from the config seed,
//! runs the tick loop, and writes a CSV trace plus a JSON snapshot of the
//! final state to `output/skirmish/`.
//!
//! ```text
//! cargo run -p skirmish --release -- [config.toml] [output_dir]
//! RUST_LOG=rg_mover=debug cargo run -p skirmish
//! ```

mod scenario;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use rg_core::{SimConfig, Tick};
use rg_grid::{ObjectKind, World};
use rg_mover::{DriveState, MoverEvent};
use rg_output::{CsvWriter, TraceObserver};
use rg_path::EdgeFollower;
use rg_sim::{SimBuilder, SimObserver, TickSummary};

use scenario::ScenarioConfig;

const DEFAULT_CONFIG: &str = "demos/skirmish/skirmish.toml";
const DEFAULT_OUTPUT: &str = "output/skirmish";

// ── Observer wrapper to tally events ─────────────────────────────────────────

#[derive(Default)]
struct Tally {
    steps:     usize,
    arrived:   usize,
    close:     usize,
    gave_up:   usize,
    blocked:   usize,
    peak_busy: usize,
}

struct TallyObserver<O: SimObserver> {
    inner: O,
    tally: Tally,
}

impl<O: SimObserver> SimObserver for TallyObserver<O> {
    fn on_tick_start(&mut self, tick: Tick) {
        self.inner.on_tick_start(tick);
    }

    fn on_mover_event(&mut self, tick: Tick, event: &MoverEvent, world: &World) {
        match event {
            MoverEvent::Moved { .. } => self.tally.steps += 1,
            MoverEvent::Arrived { close_enough, .. } => {
                self.tally.arrived += 1;
                if *close_enough {
                    self.tally.close += 1;
                }
            }
            MoverEvent::StepBlocked { .. } => self.tally.blocked += 1,
            MoverEvent::UnableToComply { object } => {
                self.tally.gave_up += 1;
                warn!(%object, %tick, "unit could not reach its order");
            }
            MoverEvent::PathFailed { .. } | MoverEvent::Deployed { .. } => {}
        }
        self.inner.on_mover_event(tick, event, world);
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        self.tally.peak_busy = self.tally.peak_busy.max(summary.busy);
        if tick.0 % 100 == 0 {
            info!(%tick, busy = summary.busy, moved = summary.moved, "progress");
        }
        self.inner.on_tick_end(tick, summary);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config_path = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_CONFIG.into()));
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.into()));

    // 1. Configuration.
    let config = SimConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let scenario_cfg = ScenarioConfig::from_toml_str(&std::fs::read_to_string(&config_path)?)?;
    println!("=== skirmish — rts_grid movement core ===");
    println!(
        "Map: {}x{}  |  Units per side: {} (+{} air)  |  Ticks: {}  |  Seed: {}",
        scenario_cfg.width,
        scenario_cfg.height,
        scenario_cfg.units_per_side,
        scenario_cfg.aircraft,
        config.total_ticks,
        config.seed
    );

    // 2. Scenario.
    let scenario = scenario::build(&scenario_cfg, config.seed)?;
    println!(
        "Placed {} objects ({} with orders), bases {} and {}",
        scenario.world.objects.len(),
        scenario.orders.len(),
        scenario.bases[0],
        scenario.bases[1]
    );

    // 3. Sim.
    let pathfinder = EdgeFollower::new(config.path.clone());
    let mut sim = SimBuilder::new(config.clone(), scenario.world, pathfinder)
        .threat(scenario.threat)
        .orders(scenario.orders)
        .build()?;
    if let Some(limit) = scenario_cfg.danger_limit {
        for &id in &scenario.cautious {
            sim.movers.set_danger_limit(id, Some(limit))?;
        }
    }

    // 4. Output.
    let writer = CsvWriter::new(&output_dir)?;
    let mut obs = TallyObserver { inner: TraceObserver::new(writer, &config), tally: Tally::default() };

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }
    sim.world.audit_occupancy().context("occupancy audit after run")?;

    // 6. Snapshot.
    let snapshot_path = output_dir.join("snapshot.json");
    write_snapshot(&snapshot_path, &serde_json::to_string_pretty(&sim.snapshot())?)?;

    // 7. Summary.
    let t = &obs.tally;
    println!();
    println!("Simulation complete in {:.3} s ({})", elapsed.as_secs_f64(), sim.clock);
    println!("  steps taken      : {}", t.steps);
    println!("  arrivals         : {} ({} close enough)", t.arrived, t.close);
    println!("  stale routes     : {}", t.blocked);
    println!("  unable to comply : {}", t.gave_up);
    println!("  peak busy movers : {}", t.peak_busy);
    println!();

    println!("{:<14} {:<10} {:<14} {:<10}", "Object", "Kind", "State", "Cell");
    println!("{}", "-".repeat(50));
    for mover in sim.movers.store.iter().filter(|m| m.state != DriveState::Idle) {
        let Ok(record) = sim.world.object(mover.object) else {
            continue;
        };
        let kind = match record.kind {
            ObjectKind::Infantry => "infantry",
            ObjectKind::Vehicle  => "vehicle",
            ObjectKind::Aircraft => "aircraft",
            _                    => "other",
        };
        let cell = sim.world.grid.coord(record.cell);
        println!(
            "{:<14} {:<10} {:<14} ({}, {})",
            mover.object.to_string(),
            kind,
            format!("{:?}", mover.state),
            cell.x,
            cell.y
        );
    }
    println!();
    println!("Trace written to {}", output_dir.display());
    Ok(())
}

fn write_snapshot(path: &Path, json: &str) -> Result<()> {
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
