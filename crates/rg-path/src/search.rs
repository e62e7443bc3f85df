//! Search scratch state and the edge-following walk.
//!
//! The walk heads straight for the destination while it can.  When the next
//! cell is blocked it finds the first passable cell on the far side of the
//! obstacle, then traces the obstacle boundary clockwise and anticlockwise on
//! separate copies of the trail and keeps the better one.  Every cell entered
//! is recorded in a visited bitset so that loops are detected and cut out as
//! they form.
//!
//! When the trail buffer fills on open ground, or right after a completed
//! edge-follow, the trail so far is returned as an incomplete segment and the
//! caller replans from its end.

use rg_core::{CellCoord, CellId, Facing, Locomotion, MoveType, PathLimits};
use rg_grid::World;
use tracing::trace;

use crate::finder::PathQuery;
use crate::optimize::optimize;
use crate::passage::can_enter;
use crate::{NotFoundReason, Path, PathError, PathResult};

// ── Trail ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Step {
    pub facing: Facing,
    /// Cell entered by this step.
    pub cell:   CellId,
    pub cost:   u32,
}

/// The path under construction plus its loop bookkeeping.
#[derive(Clone, Debug)]
pub(crate) struct Trail {
    start:        CellId,
    steps:        Vec<Step>,
    visited:      Vec<u64>,
    last_overlap: Option<CellId>,
    last_fixup:   Option<CellId>,
}

impl Trail {
    fn new(start: CellId, cells: usize) -> Self {
        let mut trail = Self {
            start,
            steps: Vec::new(),
            visited: vec![0; cells.div_ceil(64)],
            last_overlap: None,
            last_fixup: None,
        };
        trail.mark(start);
        trail
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn end(&self) -> CellId {
        self.steps.last().map_or(self.start, |s| s.cell)
    }

    #[inline]
    fn last(&self) -> Option<Step> {
        self.steps.last().copied()
    }

    fn cost(&self) -> u32 {
        self.steps.iter().map(|s| s.cost).sum()
    }

    #[inline]
    fn is_visited(&self, cell: CellId) -> bool {
        let i = cell.index();
        self.visited[i / 64] & (1 << (i % 64)) != 0
    }

    #[inline]
    fn mark(&mut self, cell: CellId) {
        let i = cell.index();
        self.visited[i / 64] |= 1 << (i % 64);
    }

    #[inline]
    fn unmark(&mut self, cell: CellId) {
        let i = cell.index();
        self.visited[i / 64] &= !(1 << (i % 64));
    }

    fn push(&mut self, step: Step) {
        self.mark(step.cell);
        self.steps.push(step);
    }

    fn pop(&mut self) -> Option<Step> {
        let step = self.steps.pop()?;
        self.unmark(step.cell);
        Some(step)
    }

    /// Drop steps until the trail ends at `cell`.
    fn truncate_to(&mut self, cell: CellId) {
        while self.end() != cell && self.pop().is_some() {}
    }
}

/// The line from an edge-follow's start to its target.  `side` is zero on the
/// line and signed by which half-plane a point is in.
#[derive(Copy, Clone, Debug)]
struct Line {
    a: CellCoord,
    b: CellCoord,
}

impl Line {
    #[inline]
    fn side(&self, p: CellCoord) -> i64 {
        let (px, py) = (p.x as i64, p.y as i64);
        let (ax, ay) = (self.a.x as i64, self.a.y as i64);
        let (bx, by) = (self.b.x as i64, self.b.y as i64);
        (px - bx) * (ay - by) - (py - by) * (ax - bx)
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

/// One `find_path` call.  Never mutates the world.
pub(crate) struct Search<'q> {
    world:       &'q World,
    query:       &'q PathQuery<'q>,
    limits:      &'q PathLimits,
    origin_zone: u16,
    visits:      usize,
    unravels:    usize,
    /// Set when an edge-follow of the current obstacle stopped because the
    /// trail buffer was full.
    hit_cap:     bool,
}

impl<'q> Search<'q> {
    pub fn new(world: &'q World, query: &'q PathQuery<'q>, limits: &'q PathLimits) -> Self {
        Self { world, query, limits, origin_zone: 0, visits: 0, unravels: 0, hit_cap: false }
    }

    /// Cell registrations made so far.
    #[inline]
    pub fn visits(&self) -> usize {
        self.visits
    }

    /// Times an edge-follow backed out of a loop it could not cut.
    #[inline]
    pub fn unravels(&self) -> usize {
        self.unravels
    }

    /// Run the search.  The counters stay readable afterwards.
    pub fn route(&mut self) -> PathResult<Path> {
        let (world, query) = (self.world, self.query);
        let grid = &world.grid;
        let (start, dest) = (query.start, query.dest);
        for cell in [start, dest] {
            if !grid.contains(cell) {
                return Err(PathError::CellOutOfRange(cell));
            }
        }
        if start == dest {
            return Ok(Path::empty(start));
        }

        let profile = &query.profile;
        if profile.locomotion != Locomotion::Winged {
            self.origin_zone = grid.zone(start, profile.zone_kind);
            if self.origin_zone == 0 || self.origin_zone != grid.zone(dest, profile.zone_kind) {
                return Err(self.not_found(NotFoundReason::Unreachable));
            }
        }
        if self.cost(dest) == 0 {
            return Err(self.not_found(NotFoundReason::DestinationBlocked));
        }

        let mut trail = Trail::new(start, grid.len());
        loop {
            let cursor = trail.end();
            if cursor == dest {
                break;
            }
            if trail.len() >= self.limits.max_path_len {
                if trail.steps.is_empty() {
                    return Err(PathError::LengthExceeded { limit: self.limits.max_path_len });
                }
                break;
            }
            let Some(facing) = Facing::toward(grid.coord(cursor), grid.coord(dest)) else {
                break;
            };

            let next = grid.adjacent(cursor, facing);
            let cost = self.cost_at(next);
            if let (Some(next), true) = (next, cost > 0) {
                if !self.register(&mut trail, next, facing, cost)? {
                    return Err(self.not_found(NotFoundReason::NoRoute));
                }
                continue;
            }

            trail = self.around_obstacle(trail, facing)?;
        }

        let end = trail.end();
        let steps = optimize(grid, start, &trail.steps, |cell| self.cost(cell));
        Ok(Path {
            start,
            end,
            cost: steps.iter().map(|s| s.cost).sum(),
            facings: steps.into_iter().map(|s| s.facing).collect(),
            complete: end == dest,
        })
    }

    fn not_found(&self, reason: NotFoundReason) -> PathError {
        PathError::NotFound { from: self.query.start, to: self.query.dest, reason }
    }

    /// Cost of entering `cell` for this query; `0` means impassable.
    fn cost(&self, cell: CellId) -> u32 {
        let profile = &self.query.profile;
        if profile.locomotion != Locomotion::Winged
            && self.world.grid.zone(cell, profile.zone_kind) != self.origin_zone
        {
            return 0;
        }
        let mt = can_enter(self.world, profile, cell);
        if mt == MoveType::No || mt > self.query.threshold {
            return 0;
        }
        if let Some(limit) = self.query.danger {
            if self.query.threat.danger(cell) > limit {
                return 0;
            }
        }
        mt.cost()
    }

    #[inline]
    fn cost_at(&self, cell: Option<CellId>) -> u32 {
        cell.map_or(0, |c| self.cost(c))
    }

    /// Append a step, cutting out any loop it closes.
    ///
    /// Stepping straight back pops the previous step.  Re-entering an earlier
    /// cell truncates the trail back to it.  Re-entering the same cell twice
    /// in a row is a loop that truncation cannot fix; that returns `false`.
    fn register(&mut self, trail: &mut Trail, cell: CellId, facing: Facing, cost: u32) -> PathResult<bool> {
        self.visits += 1;
        if self.visits > self.limits.visit_budget {
            return Err(PathError::VisitBudgetExhausted { budget: self.limits.visit_budget });
        }

        if !trail.is_visited(cell) {
            debug_assert!(trail.len() < self.limits.max_path_len);
            trail.push(Step { facing, cell, cost });
            return Ok(true);
        }
        if trail.last().is_some_and(|s| s.facing == facing.opposite()) {
            trail.pop();
            return Ok(true);
        }
        if trail.last_overlap == Some(cell) {
            return Ok(false);
        }
        trail.last_overlap = Some(cell);
        trail.truncate_to(cell);
        Ok(true)
    }

    /// Get past the obstacle in direction `blocked` from the trail's end.
    fn around_obstacle(&mut self, trail: Trail, blocked: Facing) -> PathResult<Trail> {
        let from = trail.end();
        let mut probe = from;
        self.hit_cap = false;

        for _ in 0..=self.limits.obstacle_rescans {
            let Some(target) = self.beyond_obstacle(probe) else {
                break;
            };

            let mut cw = trail.clone();
            let mut ccw = trail.clone();
            let cw_ok = self.follow_edge(from, target, &mut cw, 1, blocked)?;
            let ccw_ok = self.follow_edge(from, target, &mut ccw, -1, blocked)?;
            trace!(
                from = %from, target = %target,
                cw = ?cw_ok.then(|| cw.len()), ccw = ?ccw_ok.then(|| ccw.len()),
                "edge follow"
            );

            match (cw_ok, ccw_ok) {
                (true, true) => {
                    // Shorter wins, then cheaper, then clockwise.
                    let better_ccw = (ccw.len(), ccw.cost()) < (cw.len(), cw.cost());
                    return Ok(if better_ccw { ccw } else { cw });
                }
                (true, false) => return Ok(cw),
                (false, true) => return Ok(ccw),
                (false, false) => {}
            }

            // Doughnut: the target sits inside an enclosed pocket.  Scan on
            // toward the destination to the next obstacle and try again.
            match self.next_obstacle(target) {
                Some(next) => probe = next,
                None => break,
            }
        }

        if self.hit_cap {
            Err(PathError::LengthExceeded { limit: self.limits.max_path_len })
        } else {
            Err(self.not_found(NotFoundReason::NoRoute))
        }
    }

    /// First passable cell past the obstacle lying between `probe` and the
    /// destination.
    fn beyond_obstacle(&self, mut probe: CellId) -> Option<CellId> {
        let grid = &self.world.grid;
        let dest_at = grid.coord(self.query.dest);
        loop {
            let facing = Facing::toward(grid.coord(probe), dest_at)?;
            probe = grid.adjacent(probe, facing)?;
            if self.cost(probe) > 0 {
                return Some(probe);
            }
        }
    }

    /// Walk on from `probe` toward the destination and return the last open
    /// cell before the next obstacle.  `None` when nothing is in the way.
    fn next_obstacle(&self, mut probe: CellId) -> Option<CellId> {
        let grid = &self.world.grid;
        let dest_at = grid.coord(self.query.dest);
        loop {
            let facing = Facing::toward(grid.coord(probe), dest_at)?;
            match grid.adjacent(probe, facing) {
                Some(next) if self.cost(next) > 0 => probe = next,
                _ => return Some(probe),
            }
        }
    }

    /// Trace the obstacle boundary from `start` until `target` is reached.
    ///
    /// `sense` is `1` for clockwise, `-1` for anticlockwise.  `old_dir` is the
    /// facing that pointed into the obstacle.  Returns `false` when the
    /// follower turns a full circle, comes back to its first step, runs out of
    /// its visit allowance, or fills the trail buffer.
    fn follow_edge(
        &mut self,
        start:   CellId,
        target:  CellId,
        trail:   &mut Trail,
        sense:   i32,
        old_dir: Facing,
    ) -> PathResult<bool> {
        let world = self.world;
        let grid = &world.grid;
        let line = Line { a: grid.coord(start), b: grid.coord(target) };
        trail.last_overlap = None;
        trail.last_fixup = None;

        let mut online = true;
        let mut old_side = 0i64;
        let mut first: Option<(CellId, Facing)> = None;
        let mut old_cell = start;
        let mut old_dir = old_dir;
        let mut cell_count = 0usize;

        while trail.len() < self.limits.max_path_len {
            let mut dir = old_dir;
            let (mut new_cell, mut new_dir, new_cost) = loop {
                dir = dir.rotate(sense);
                let mut force_fail = false;

                if dir.is_diagonal() {
                    // Cut the corner straight onto the target when it is the
                    // next cell round.
                    let around = dir.rotate(sense);
                    if let Some(corner) = grid.adjacent(old_cell, around) {
                        if corner == target {
                            let c = self.cost(corner);
                            if c > 0 {
                                break (corner, around, c);
                            }
                        }
                    }
                    // Refuse diagonals that jump across the start→target line.
                    if let Some(check) = grid.adjacent(old_cell, dir) {
                        let s = line.side(grid.coord(check));
                        force_fail = s != 0 && !online && s.signum() != old_side.signum();
                    }
                    if trail.last().is_some_and(|s| s.facing == dir.opposite()) {
                        force_fail = false;
                    }
                }

                if dir == old_dir {
                    return Ok(false);
                }
                let next = grid.adjacent(old_cell, dir);
                let c = self.cost_at(next);
                if let (Some(next), true) = (next, c > 0 && !force_fail) {
                    break (next, dir, c);
                }
            };

            if !self.register(trail, new_cell, new_dir, new_cost)? {
                self.unravels += 1;
                if !unravel(trail, &line, grid, &mut new_cell, &mut new_dir) {
                    return Ok(false);
                }
                new_dir = new_dir.rotate(sense * 2);
            }

            let s = line.side(grid.coord(new_cell));
            if s != 0 {
                old_side = s;
                online = false;
            } else {
                online = true;
            }

            cell_count += 1;
            if cell_count >= self.limits.edge_follow_visits {
                return Ok(false);
            }
            if new_cell == target {
                return Ok(true);
            }
            match first {
                Some(f) if f == (new_cell, new_dir) => return Ok(false),
                None => first = Some((new_cell, new_dir)),
                _ => {}
            }

            old_dir = new_dir.rotate(-sense * 3);
            old_cell = new_cell;
        }

        self.hit_cap = true;
        Ok(false)
    }
}

/// Back the trail up to the last point where it touched `line` while leaving
/// it diagonally, so the follower can resume from there.  Each point is used
/// at most once per edge-follow.
fn unravel(
    trail:  &mut Trail,
    line:   &Line,
    grid:   &rg_grid::Grid,
    cell:   &mut CellId,
    facing: &mut Facing,
) -> bool {
    let mut leaving = *facing;
    let mut on_line_before = false;

    while let Some(last) = trail.last() {
        let pos = last.cell;
        if line.side(grid.coord(pos)) == 0 || on_line_before {
            if leaving.is_diagonal() && trail.last_fixup != Some(pos) {
                *cell = pos;
                *facing = last.facing;
                trail.last_fixup = Some(pos);
                return true;
            }
            on_line_before = !on_line_before;
        }
        leaving = last.facing;
        trail.pop();
    }
    false
}
