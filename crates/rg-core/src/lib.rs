//! `rg-core` — foundational types for the `rts_grid` movement core.
//!
//! This crate is a dependency of every other `rg-*` crate.  It has no `rg-*`
//! dependencies and minimal external ones (`rand` and `thiserror`, plus
//! optional `serde`/`toml`).
//!
//! # What lives here
//!
//! | Module           | Contents                                              |
//! |------------------|-------------------------------------------------------|
//! | [`ids`]          | `CellId`, `ObjectId`, `HouseId`                       |
//! | [`facing`]       | `Facing`, `CellCoord`, `Coord` (leptons)              |
//! | [`time`]         | `Tick`, `SimClock`                                    |
//! | [`rng`]          | `SimRng` (scenario generation)                        |
//! | [`locomotion`]   | `Locomotion`, `ZoneKind`, `MoveType`                  |
//! | [`config`]       | `SimConfig`, `PathLimits`, `DriveRules`               |
//! | [`error`]        | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types and     |
//! |         | enables `SimConfig::from_toml_str` / `SimConfig::load`.    |

pub mod config;
pub mod error;
pub mod facing;
pub mod ids;
pub mod locomotion;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DriveRules, PathLimits, SimConfig};
pub use error::{CoreError, CoreResult};
pub use facing::{CellCoord, Coord, Facing, CELL_LEPTONS};
pub use ids::{CellId, HouseId, ObjectId};
pub use locomotion::{Locomotion, MoveType, ZoneKind};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
