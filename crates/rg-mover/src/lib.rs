//! `rg-mover` — per-unit drive state machine and the engine that runs it.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`state`]  | `DriveState`, `Mover` — per-unit order and path window        |
//! | [`store`]  | `MoverStore` — movers ordered by `ObjectId`                   |
//! | [`engine`] | `MoverEngine<P>` — plan/apply tick, orders, retries           |
//! | [`event`]  | `MoverEvent` — notifications for the mission layer            |
//! | [`error`]  | `MoverError`, `MoverResult<T>`                                |
//!
//! # Drive model
//!
//! A unit moves exactly one cell per tick.  A route is computed when an
//! order arrives and whenever the kept window of it runs out; each step is
//! re-validated against the live world before the unit is relocated, so a
//! stale route costs a retry rather than an inconsistent grid.  Failed
//! attempts wait out an integer countdown in `Blocked`, and a unit that keeps
//! failing gives up with `UnableToComply`.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Mover` and `DriveState`. |

pub mod engine;
pub mod error;
pub mod event;
pub mod state;
pub mod store;


pub use engine::{MoverEngine, Planned};
pub use error::{MoverError, MoverResult};
pub use event::MoverEvent;
pub use state::{DriveState, Mover};
pub use store::MoverStore;
