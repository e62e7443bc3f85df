//! `rg-output` — run traces for the rts_grid movement core.
//!
//! | Backend | Files created                                 |
//! |---------|-----------------------------------------------|
//! | CSV     | `mover_steps.csv`, `tick_summaries.csv`       |
//!
//! Backends implement [`OutputWriter`] and are driven by [`TraceObserver`],
//! which implements `rg_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rg_output::{CsvWriter, TraceObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer, &sim.config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{MoverStepRow, TickSummaryRow};
pub use writer::OutputWriter;
