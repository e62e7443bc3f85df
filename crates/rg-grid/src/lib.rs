//! `rg-grid` — the spatial index: cells, occupancy, zones, and objects.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`cell`]    | `Cell`, `LandType`, `Overlay`, `Spot`, `OccupyFlags`          |
//! | [`land`]    | per-locomotion land speed table                               |
//! | [`grid`]    | `Grid` — adjacency, `is_clear_to_move`, occupy/overlap        |
//! | [`zone`]    | 8-connected flood fill for every `ZoneKind`                   |
//! | [`object`]  | `ObjectKind`, `ObjectRecord`, `ObjectTable` (slot table)      |
//! | [`world`]   | `World` — grid + objects, spawn/remove/relocate, audits       |
//! | [`error`]   | `GridError`, `GridResult<T>`                                  |
//!
//! # Ownership model
//!
//! Cells never hold references to objects.  Occupant chains and overlap
//! lists store `ObjectId` handles into the `ObjectTable`, and each
//! `ObjectRecord` stores the `CellId` it last occupied.  Both sides are plain
//! integers, so the whole world can be snapshotted and the derived parts
//! (chains, flags, zones) rebuilt after load with
//! [`World::rebuild_occupancy`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Serialize terrain and the object table.                    |

pub mod cell;
pub mod error;
pub mod grid;
pub mod land;
pub mod object;
pub mod world;
pub mod zone;


pub use cell::{Cell, Footprint, LandType, OccupyFlags, Overlay, Spot};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use land::land_speed;
pub use object::{ObjectKind, ObjectRecord, ObjectTable};
pub use world::World;
