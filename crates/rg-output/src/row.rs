//! Plain data row types written by output backends.

/// One cell-to-cell step taken by a mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoverStepRow {
    pub tick:   u64,
    pub object: u32,
    pub from_x: i32,
    pub from_y: i32,
    pub to_x:   i32,
    pub to_y:   i32,
}

/// Counts for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:          u64,
    /// Game time at the start of the tick.
    pub game_millis:   u64,
    pub planned:       u64,
    pub moved:         u64,
    pub arrived:       u64,
    pub path_failures: u64,
    pub step_blocked:  u64,
    pub gave_up:       u64,
    pub busy:          u64,
}
