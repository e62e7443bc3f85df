//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `mover_steps.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{MoverStepRow, OutputResult, TickSummaryRow};

pub const STEPS_FILE: &str = "mover_steps.csv";
pub const SUMMARIES_FILE: &str = "tick_summaries.csv";

/// Writes a run trace to two CSV files.
pub struct CsvWriter {
    steps:     Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` (truncating old ones) and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut steps = Writer::from_path(dir.join(STEPS_FILE))?;
        steps.write_record(["tick", "object", "from_x", "from_y", "to_x", "to_y"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record([
            "tick",
            "game_millis",
            "planned",
            "moved",
            "arrived",
            "path_failures",
            "step_blocked",
            "gave_up",
            "busy",
        ])?;

        Ok(Self { steps, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_steps(&mut self, rows: &[MoverStepRow]) -> OutputResult<()> {
        for row in rows {
            self.steps.write_record(&[
                row.tick.to_string(),
                row.object.to_string(),
                row.from_x.to_string(),
                row.from_y.to_string(),
                row.to_x.to_string(),
                row.to_y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.game_millis.to_string(),
            row.planned.to_string(),
            row.moved.to_string(),
            row.arrived.to_string(),
            row.path_failures.to_string(),
            row.step_blocked.to_string(),
            row.gave_up.to_string(),
            row.busy.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.steps.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
