//! The `OutputWriter` trait implemented by trace backends.

use crate::{MoverStepRow, OutputResult, TickSummaryRow};

/// A sink for trace rows.
///
/// Errors are returned here but swallowed by
/// [`TraceObserver`][crate::TraceObserver], which keeps the first one for
/// [`take_error`][crate::TraceObserver::take_error].
pub trait OutputWriter {
    /// Write the steps taken during one tick.
    fn write_steps(&mut self, rows: &[MoverStepRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush everything written so far. Later calls are no-ops.
    fn finish(&mut self) -> OutputResult<()>;
}
