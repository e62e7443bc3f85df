//! `TraceObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use rg_core::{SimClock, SimConfig, Tick};
use rg_grid::World;
use rg_mover::MoverEvent;
use rg_sim::{SimObserver, TickSummary};

use crate::row::{MoverStepRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes every step and every tick summary to an
/// [`OutputWriter`].
///
/// Steps are buffered for the duration of a tick and written in one batch
/// at tick end.  Errors from the writer are stored internally because
/// `SimObserver` methods have no return value.  After `sim.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct TraceObserver<W: OutputWriter> {
    writer:     W,
    clock:      SimClock,
    pending:    Vec<MoverStepRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TraceObserver<W> {
    /// Create an observer backed by `writer`, using `config` for game-time
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            clock:      config.make_clock(),
            pending:    Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for TraceObserver<W> {
    fn on_mover_event(&mut self, tick: Tick, event: &MoverEvent, world: &World) {
        let MoverEvent::Moved { object, from, to } = *event else {
            return;
        };
        let (from, to) = (world.grid.coord(from), world.grid.coord(to));
        self.pending.push(MoverStepRow {
            tick:   tick.0,
            object: object.0,
            from_x: from.x,
            from_y: from.y,
            to_x:   to.x,
            to_y:   to.y,
        });
    }

    fn on_tick_end(&mut self, tick: Tick, summary: &TickSummary) {
        if !self.pending.is_empty() {
            let rows = std::mem::take(&mut self.pending);
            let result = self.writer.write_steps(&rows);
            self.store_err(result);
        }
        let row = TickSummaryRow {
            tick:          tick.0,
            game_millis:   self.clock.millis_at(tick),
            planned:       summary.planned as u64,
            moved:         summary.moved as u64,
            arrived:       summary.arrived as u64,
            path_failures: summary.path_failures as u64,
            step_blocked:  summary.step_blocked as u64,
            gave_up:       summary.gave_up as u64,
            busy:          summary.busy as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
