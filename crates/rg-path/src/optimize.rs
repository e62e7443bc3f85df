//! Post-search path smoothing.
//!
//! A single stack pass over the raw steps.  Each new step is compared with
//! the one before it by the clockwise turn between their facings:
//!
//! | Turn   | Action                                                     |
//! |--------|------------------------------------------------------------|
//! | 0,1,7  | keep                                                       |
//! | 4      | reversal, both steps cancel                                |
//! | 2,6    | after a straight step: merge into the diagonal between     |
//! | 2,6    | after a diagonal: two straights, if the new middle is open  |
//! | 3,5    | merge into the single step with the same displacement      |
//!
//! Merged steps keep the cell and cost of the later step; the merged result
//! is compared against its new predecessor again.

use rg_core::CellId;
use rg_grid::Grid;

use crate::search::Step;

pub(crate) fn optimize(
    grid:  &Grid,
    start: CellId,
    steps: &[Step],
    cost:  impl Fn(CellId) -> u32,
) -> Vec<Step> {
    let mut out: Vec<Step> = Vec::with_capacity(steps.len());

    for &step in steps {
        let mut cmd = step;
        loop {
            let Some(&prev) = out.last() else {
                out.push(cmd);
                break;
            };
            let shift = match (prev.facing.turn_to(cmd.facing), prev.facing.is_diagonal()) {
                (0 | 1 | 7, _) => {
                    out.push(cmd);
                    break;
                }
                (4, _) => {
                    out.pop();
                    break;
                }
                (2 | 6, true) => {
                    let turn = if prev.facing.turn_to(cmd.facing) == 2 { 1 } else { -1 };
                    let smoothed = prev.facing.rotate(turn);
                    let before = out.len().checked_sub(2).map_or(start, |i| out[i].cell);
                    match grid.adjacent(before, smoothed).map(|mid| (mid, cost(mid))) {
                        Some((mid, c)) if c > 0 => {
                            let n = out.len() - 1;
                            out[n] = Step { facing: smoothed, cell: mid, cost: c };
                            out.push(Step { facing: smoothed, ..cmd });
                        }
                        _ => out.push(cmd),
                    }
                    break;
                }
                (2, false) => 1,
                (6, false) => -1,
                (3, true) => 1,
                (3, false) => 2,
                (5, true) => -1,
                (5, false) => -2,
                _ => {
                    out.push(cmd);
                    break;
                }
            };
            out.pop();
            cmd = Step { facing: prev.facing.rotate(shift), ..cmd };
        }
    }
    out
}
