//! Zone labelling.
//!
//! Two cells share a zone for a given `ZoneKind` iff a path of clear cells
//! connects them using the same eight moves the pathfinder takes.  Labels
//! start at 1; `0` marks a cell that is not clear for that kind.

use rg_core::{CellCoord, Facing};

/// Label every clear cell of a `width × height` grid by 8-connected
/// component.  `clear` is row-major.
pub(crate) fn flood_zones(width: u32, height: u32, clear: &[bool]) -> Vec<u16> {
    let mut labels = vec![0u16; clear.len()];
    let mut next: u16 = 1;
    let mut stack = Vec::new();

    let index = |c: CellCoord| -> Option<usize> {
        (c.x >= 0 && c.y >= 0 && (c.x as u32) < width && (c.y as u32) < height)
            .then(|| (c.y as u32 * width + c.x as u32) as usize)
    };

    for seed in 0..clear.len() {
        if !clear[seed] || labels[seed] != 0 {
            continue;
        }
        labels[seed] = next;
        stack.push(seed);
        while let Some(i) = stack.pop() {
            let at = CellCoord::new((i as u32 % width) as i32, (i as u32 / width) as i32);
            for facing in Facing::ALL {
                if let Some(n) = index(at.step(facing)) {
                    if clear[n] && labels[n] == 0 {
                        labels[n] = next;
                        stack.push(n);
                    }
                }
            }
        }
        // Labels past u16::MAX share the last one.
        next = next.saturating_add(1);
    }
    labels
}
