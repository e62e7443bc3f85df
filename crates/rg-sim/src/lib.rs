//! `rg-sim` — tick loop orchestrator for the rts_grid movement core.
//!
//! # Two-phase tick loop
//!
//! ```text
//! for tick in current..config.total_ticks:
//!   ① Plan   — every mover that needs a route asks the pathfinder, reading
//!              the start-of-tick world (parallel with the `parallel` feature).
//!   ② Apply  — for each mover in ascending ObjectId order:
//!                plan found   → keep a window of it, start driving
//!                plan failed  → Blocked countdown, or UnableToComply
//!                driving      → re-check the next cell, relocate one step
//!   ③ Report — mover events, tick summary, periodic world snapshot.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the plan phase on Rayon's thread pool.            |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rg_core::SimConfig;
//! use rg_path::EdgeFollower;
//! use rg_sim::{NoopObserver, SimBuilder};
//!
//! let pathfinder = EdgeFollower::new(config.path.clone());
//! let mut sim = SimBuilder::new(config, world, pathfinder).build()?;
//! sim.run(&mut NoopObserver)?;
//! let saved = sim.snapshot();
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod snapshot;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver, TickSummary};
pub use sim::Sim;
pub use snapshot::SimSnapshot;
