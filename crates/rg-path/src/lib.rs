//! `rg-path` — grid pathfinding for ground, sea and air units.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`finder`]   | `Pathfinder` trait, `PathQuery`, `EdgeFollower`           |
//! | [`passage`]  | `MoveProfile`, `can_enter` — the passability ladder       |
//! | [`threat`]   | `ThreatSource` trait, `NoThreat`, `ThreatMap`             |
//! | [`path`]     | `Path`                                                    |
//! | [`error`]    | `PathError`, `NotFoundReason`, `PathResult<T>`            |
//!
//! The search scratch (`search`) and the smoothing pass (`optimize`) are
//! private.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod finder;
pub mod passage;
pub mod path;
pub mod threat;

mod optimize;
mod search;

#[cfg(test)]
mod tests;

pub use error::{NotFoundReason, PathError, PathResult};
pub use finder::{EdgeFollower, PathQuery, Pathfinder};
pub use passage::{can_enter, MoveProfile};
pub use path::Path;
pub use threat::{NoThreat, ThreatMap, ThreatSource};
