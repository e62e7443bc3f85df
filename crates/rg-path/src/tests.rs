//! Unit and property tests for rg-path.
//!
//! Scenario maps are small enough that every expected route was traced by
//! hand.

#[cfg(test)]
mod helpers {
    use rg_core::{CellCoord, CellId, HouseId, Locomotion, ObjectId, PathLimits, ZoneKind};
    use rg_grid::{Grid, Overlay, World};
    use crate::{EdgeFollower, MoveProfile, Path, PathQuery, PathResult, Pathfinder};

    pub fn id(grid: &Grid, x: i32, y: i32) -> CellId {
        grid.cell_id(CellCoord::new(x, y)).unwrap()
    }

    /// A tracked unit that is not itself on the map.
    pub fn profile() -> MoveProfile {
        MoveProfile {
            object:     ObjectId::INVALID,
            owner:      HouseId(0),
            locomotion: Locomotion::Track,
            zone_kind:  ZoneKind::Normal,
            armed:      false,
        }
    }

    pub fn open(w: u32, h: u32) -> World {
        World::new(Grid::new(w, h).unwrap())
    }

    pub fn with_walls(w: u32, h: u32, walls: &[(i32, i32)]) -> World {
        let mut grid = Grid::new(w, h).unwrap();
        let edits: Vec<_> = walls.iter().map(|&(x, y)| (id(&grid, x, y), Overlay::Concrete)).collect();
        grid.set_overlays(edits).unwrap();
        World::new(grid)
    }

    /// Concrete wherever a row has `#`.  Row 0 is the top of the map.
    pub fn from_rows(rows: &[&str]) -> World {
        let walls: Vec<_> = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.chars().enumerate().filter(|&(_, ch)| ch == '#').map(move |(x, _)| (x as i32, y as i32))
            })
            .collect();
        with_walls(rows[0].len() as u32, rows.len() as u32, &walls)
    }

    /// 10×10 with concrete down column 5, rows 0..=8.
    pub fn walled() -> World {
        let wall: Vec<_> = (0..9).map(|y| (5, y)).collect();
        with_walls(10, 10, &wall)
    }

    pub fn find(world: &World, from: (i32, i32), to: (i32, i32)) -> PathResult<Path> {
        let g = &world.grid;
        let q = PathQuery::new(id(g, from.0, from.1), id(g, to.0, to.1), profile());
        EdgeFollower::default().find_path(world, &q)
    }

    pub fn find_with(world: &World, limits: PathLimits, from: (i32, i32), to: (i32, i32)) -> PathResult<Path> {
        let g = &world.grid;
        let q = PathQuery::new(id(g, from.0, from.1), id(g, to.0, to.1), profile());
        EdgeFollower::new(limits).find_path(world, &q)
    }

    pub fn coords(world: &World, path: &Path) -> Vec<(i32, i32)> {
        path.cells(&world.grid)
            .into_iter()
            .map(|c| {
                let at = world.grid.coord(c);
                (at.x, at.y)
            })
            .collect()
    }
}

// ── Open ground ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod open_ground {
    use rg_core::Facing;
    use crate::PathError;
    use super::helpers::{find, open};

    #[test]
    fn diagonal_corner_to_corner() {
        let w = open(10, 10);
        let path = find(&w, (0, 0), (9, 9)).unwrap();
        assert_eq!(path.facings, vec![Facing::SouthEast; 9]);
        assert_eq!(path.cost, 9);
        assert_eq!(path.end, super::helpers::id(&w.grid, 9, 9));
        assert!(path.complete);
    }

    #[test]
    fn knight_offset_is_chebyshev() {
        let w = open(10, 10);
        let path = find(&w, (0, 0), (7, 3)).unwrap();
        assert_eq!(path.len(), 7);
        assert_eq!(*path.cells(&w.grid).last().unwrap(), path.end);
    }

    #[test]
    fn same_cell_is_empty() {
        let w = open(4, 4);
        let path = find(&w, (2, 2), (2, 2)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.cost, 0);
    }

    #[test]
    fn off_map_cell_is_rejected() {
        use crate::{EdgeFollower, PathQuery, Pathfinder};
        use rg_core::CellId;

        let w = open(4, 4);
        let q = PathQuery::new(CellId(0), CellId(16), super::helpers::profile());
        assert_eq!(
            EdgeFollower::default().find_path(&w, &q).unwrap_err(),
            PathError::CellOutOfRange(CellId(16))
        );
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod obstacles {
    use std::collections::HashSet;

    use rg_core::Facing::{self, *};
    use rg_core::PathLimits;
    use crate::search::Search;
    use crate::PathQuery;
    use super::helpers::{coords, find, from_rows, id, profile, walled, with_walls};

    #[test]
    fn wall_detours_through_bottom_row() {
        let w = walled();
        let path = find(&w, (0, 0), (9, 0)).unwrap();

        let mut expected: Vec<Facing> = vec![East, East, East, SouthEast];
        expected.extend([South; 7]);
        expected.extend([SouthEast, NorthEast]);
        expected.extend([North; 7]);
        expected.extend([NorthEast, East, East]);
        assert_eq!(path.facings, expected);
        assert!(path.len() > 9);

        let cells = coords(&w, &path);
        assert!(cells.contains(&(5, 9)));
        assert!(cells.iter().all(|&(x, y)| !(x == 5 && y <= 8)));
        assert_eq!(*cells.last().unwrap(), (9, 0));
    }

    #[test]
    fn wall_route_is_repeatable() {
        let a = find(&walled(), (0, 0), (9, 0)).unwrap();
        let b = find(&walled(), (0, 0), (9, 0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn convex_block_is_skirted_without_revisits() {
        let mut block = Vec::new();
        for x in 4..=6 {
            for y in 3..=5 {
                block.push((x, y));
            }
        }
        let w = with_walls(10, 10, &block);
        let path = find(&w, (1, 4), (8, 4)).unwrap();

        let cells = coords(&w, &path);
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), cells.len(), "path revisits a cell: {cells:?}");
        assert!(cells.iter().all(|c| !block.contains(c)));
        assert_eq!(path.len(), 7);
        assert_eq!(*cells.last().unwrap(), (8, 4));
    }

    #[test]
    fn repeated_overlap_is_unravelled() {
        // Clockwise from (4,3) the follower squeezes down past (4,4) into the
        // bottom row, runs out of room at the west edge and comes back to
        // (4,4) twice.  The first repeat backs up to the last diagonal exit;
        // the second leaves nothing, and the anticlockwise pass wins.
        let w = from_rows(&[
            ".....#",
            "####..",
            "....##",
            "#.##..",
            "####.#",
            ".....#",
        ]);
        let q = PathQuery::new(id(&w.grid, 4, 4), id(&w.grid, 5, 1), profile());
        let limits = PathLimits::default();
        let mut search = Search::new(&w, &q, &limits);
        let path = search.route().unwrap();

        assert!(search.unravels() >= 1);
        assert!(search.visits() <= limits.visit_budget);
        assert_eq!(path.facings, vec![North, NorthWest, NorthEast, East]);
        assert!(path.complete);
    }

    #[test]
    fn spiral_terminates() {
        // Concrete spiral wound around (5,5) with the mouth on the east side.
        let mut walls = Vec::new();
        for x in 1..=9 { walls.push((x, 1)); }
        for y in 2..=9 { walls.push((9, y)); }
        for x in 1..=8 { walls.push((x, 9)); }
        for y in 3..=8 { walls.push((1, y)); }
        for x in 2..=7 { walls.push((x, 3)); }
        for y in 4..=7 { walls.push((7, y)); }
        for x in 3..=6 { walls.push((x, 7)); }
        walls.push((3, 5));
        walls.push((3, 6));
        let w = with_walls(12, 12, &walls);

        match find(&w, (5, 5), (11, 11)) {
            Ok(path) => {
                let cells = coords(&w, &path);
                assert!(cells.iter().all(|c| !walls.contains(c)));
                assert_eq!(*cells.last().unwrap(), (11, 11));
            }
            Err(e) => assert!(e.reason().is_some() || matches!(
                e,
                crate::PathError::LengthExceeded { .. } | crate::PathError::VisitBudgetExhausted { .. }
            )),
        }
    }
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use rg_core::{HouseId, MoveType, PathLimits};
    use rg_grid::{Grid, LandType, ObjectKind, World};
    use crate::{EdgeFollower, NotFoundReason, PathError, PathQuery, Pathfinder};
    use super::helpers::{coords, find, find_with, from_rows, id, open, profile, walled, with_walls};

    #[test]
    fn other_zone_is_unreachable() {
        let mut grid = Grid::new(10, 10).unwrap();
        let river: Vec<_> = (0..10).map(|y| (id(&grid, 5, y), LandType::River)).collect();
        grid.set_lands(river).unwrap();
        let w = World::new(grid);

        let err = find(&w, (0, 0), (9, 0)).unwrap_err();
        assert_eq!(err.reason(), Some(NotFoundReason::Unreachable));
    }

    #[test]
    fn walled_in_destination_is_unreachable() {
        let ring = [(3, 3), (4, 3), (5, 3), (3, 4), (5, 4), (3, 5), (4, 5), (5, 5)];
        let w = with_walls(9, 9, &ring);
        let err = find(&w, (0, 0), (4, 4)).unwrap_err();
        assert_eq!(err.reason(), Some(NotFoundReason::Unreachable));
    }

    #[test]
    fn occupied_destination_depends_on_threshold() {
        let mut w = open(6, 1);
        let dest = id(&w.grid, 5, 0);
        w.spawn(ObjectKind::Vehicle, HouseId(0), dest).unwrap();

        let q = PathQuery::new(id(&w.grid, 0, 0), dest, profile());
        let err = EdgeFollower::default().find_path(&w, &q).unwrap_err();
        assert_eq!(err.reason(), Some(NotFoundReason::DestinationBlocked));

        let path = EdgeFollower::default()
            .find_path(&w, &q.with_threshold(MoveType::Temp))
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.cost, 4 + MoveType::Temp.cost());
    }

    #[test]
    fn tiny_visit_budget_fails_cleanly() {
        let limits = PathLimits { visit_budget: 3, ..PathLimits::default() };
        let err = find_with(&open(10, 10), limits, (0, 0), (9, 9)).unwrap_err();
        assert_eq!(err, PathError::VisitBudgetExhausted { budget: 3 });
    }

    #[test]
    fn long_route_comes_back_in_segments() {
        let w = open(10, 10);
        let limits = PathLimits { max_path_len: 5, ..PathLimits::default() };
        let first = find_with(&w, limits.clone(), (0, 0), (9, 9)).unwrap();
        assert!(!first.complete);
        assert_eq!(first.len(), 5);
        assert_eq!(first.end, id(&w.grid, 5, 5));
        assert_eq!(coords(&w, &first).last(), Some(&(5, 5)));

        let rest = find_with(&w, limits, (5, 5), (9, 9)).unwrap();
        assert!(rest.complete);
        assert_eq!(rest.len(), 4);
    }

    #[test]
    fn zero_length_buffer_is_an_error() {
        let limits = PathLimits { max_path_len: 0, ..PathLimits::default() };
        let err = find_with(&open(4, 4), limits, (0, 0), (3, 3)).unwrap_err();
        assert_eq!(err, PathError::LengthExceeded { limit: 0 });
    }

    #[test]
    fn detour_too_long_for_the_buffer_reports_length() {
        // Four steps reach the wall; neither way round fits in one more.
        let limits = PathLimits { max_path_len: 5, ..PathLimits::default() };
        let err = find_with(&walled(), limits, (0, 0), (9, 0)).unwrap_err();
        assert_eq!(err, PathError::LengthExceeded { limit: 5 });
    }

    #[test]
    fn earlier_overflow_does_not_mask_later_failure() {
        // Round the first obstacle the clockwise follow overflows and the
        // anticlockwise one gets through.  Both senses then fail at the
        // second obstacle without touching the buffer limit.
        let w = from_rows(&[
            "##.##",
            "..#..",
            "###.#",
            ".#.#.",
            "#.#..",
            ".####",
            "...#.",
            "..#..",
        ]);
        let limits = PathLimits { max_path_len: 13, ..PathLimits::default() };
        let err = find_with(&w, limits, (0, 1), (1, 6)).unwrap_err();
        assert_eq!(err.reason(), Some(NotFoundReason::NoRoute));
    }
}

// ── Threat and locomotion ─────────────────────────────────────────────────────

#[cfg(test)]
mod modifiers {
    use rg_core::{Facing, Locomotion};
    use crate::{EdgeFollower, PathQuery, Pathfinder, ThreatMap, ThreatSource};
    use super::helpers::{coords, id, open, profile, walled};

    #[test]
    fn danger_limit_avoids_hot_cells() {
        let w = open(10, 10);
        let mut threat = ThreatMap::for_grid(&w.grid);
        for y in 0..9 {
            threat.set(id(&w.grid, 3, y), 5);
        }

        let q = PathQuery::new(id(&w.grid, 0, 0), id(&w.grid, 9, 0), profile()).with_danger(2, &threat);
        let path = EdgeFollower::default().find_path(&w, &q).unwrap();
        assert!(path.cells(&w.grid).iter().all(|&c| threat.danger(c) <= 2));
        assert!(coords(&w, &path).contains(&(3, 9)));

        // Without a limit the same query walks straight through.
        let plain = EdgeFollower::default()
            .find_path(&w, &PathQuery::new(q.start, q.dest, profile()))
            .unwrap();
        assert_eq!(plain.len(), 9);
    }

    #[test]
    fn aircraft_fly_over_walls() {
        let w = walled();
        let flyer = profile().with_locomotion(Locomotion::Winged);
        let q = PathQuery::new(id(&w.grid, 0, 0), id(&w.grid, 9, 0), flyer);
        let path = EdgeFollower::default().find_path(&w, &q).unwrap();
        assert_eq!(path.facings, vec![Facing::East; 9]);
    }
}

// ── Passability ladder ────────────────────────────────────────────────────────

#[cfg(test)]
mod ladder {
    use rg_core::{HouseId, Locomotion, MoveType, ZoneKind};
    use rg_grid::{ObjectKind, Overlay};
    use crate::{can_enter, MoveProfile};
    use super::helpers::{id, open};

    #[test]
    fn allied_units_rank_by_driving() {
        let mut w = open(3, 1);
        let c = id(&w.grid, 1, 0);
        let ally = w.spawn(ObjectKind::Vehicle, HouseId(0), c).unwrap();
        let me = w.spawn(ObjectKind::Vehicle, HouseId(0), id(&w.grid, 0, 0)).unwrap();
        let p = MoveProfile::for_object(&w, me).unwrap();

        assert_eq!(can_enter(&w, &p, c), MoveType::Temp);
        w.start_driver(ally).unwrap();
        assert_eq!(can_enter(&w, &p, c), MoveType::MovingBlock);
        // A unit never blocks itself.
        assert_eq!(can_enter(&w, &p, id(&w.grid, 0, 0)), MoveType::Ok);
    }

    #[test]
    fn enemies_need_weapons() {
        let mut w = open(3, 1);
        let c = id(&w.grid, 1, 0);
        w.spawn(ObjectKind::Building { width: 1, height: 1 }, HouseId(1), c).unwrap();
        let me = w.spawn(ObjectKind::Vehicle, HouseId(0), id(&w.grid, 0, 0)).unwrap();
        let p = MoveProfile::for_object(&w, me).unwrap();

        assert_eq!(can_enter(&w, &p, c), MoveType::No);
        assert_eq!(can_enter(&w, &p.armed(true), c), MoveType::Destroyable);
    }

    #[test]
    fn crushers_roll_over_enemy_infantry() {
        let mut w = open(3, 1);
        let c = id(&w.grid, 1, 0);
        w.spawn(ObjectKind::Infantry, HouseId(1), c).unwrap();
        let me = w.spawn(ObjectKind::Vehicle, HouseId(0), id(&w.grid, 0, 0)).unwrap();
        let p = MoveProfile::for_object(&w, me).unwrap();

        assert_eq!(can_enter(&w, &p, c), MoveType::No);
        assert_eq!(can_enter(&w, &p.with_zone_kind(ZoneKind::Crusher), c), MoveType::Ok);
    }

    #[test]
    fn infantry_share_cells() {
        let mut w = open(2, 1);
        let c = id(&w.grid, 1, 0);
        w.spawn(ObjectKind::Infantry, HouseId(0), c).unwrap();
        let me = w.spawn(ObjectKind::Infantry, HouseId(0), id(&w.grid, 0, 0)).unwrap();
        let p = MoveProfile::for_object(&w, me).unwrap();
        assert_eq!(p.locomotion, Locomotion::Foot);
        assert_eq!(can_enter(&w, &p, c), MoveType::Ok);

        for _ in 0..4 {
            w.spawn(ObjectKind::Infantry, HouseId(0), c).unwrap();
        }
        assert_eq!(can_enter(&w, &p, c), MoveType::Temp);
    }

    #[test]
    fn terrain_and_aircraft() {
        let mut w = open(3, 1);
        let tree = id(&w.grid, 1, 0);
        let pad = id(&w.grid, 2, 0);
        w.spawn(ObjectKind::Terrain, HouseId(0), tree).unwrap();
        w.spawn(ObjectKind::Aircraft, HouseId(1), pad).unwrap();
        let me = w.spawn(ObjectKind::Vehicle, HouseId(0), id(&w.grid, 0, 0)).unwrap();
        let p = MoveProfile::for_object(&w, me).unwrap();

        assert_eq!(can_enter(&w, &p, tree), MoveType::No);
        assert_eq!(can_enter(&w, &p, pad), MoveType::Ok);
    }

    #[test]
    fn destroyers_rank_walls_as_destroyable() {
        let mut w = open(2, 1);
        let c = id(&w.grid, 1, 0);
        w.grid.set_overlay(c, Overlay::Concrete).unwrap();
        let me = w.spawn(ObjectKind::Vehicle, HouseId(0), id(&w.grid, 0, 0)).unwrap();
        let p = MoveProfile::for_object(&w, me).unwrap();

        assert_eq!(can_enter(&w, &p, c), MoveType::No);
        assert_eq!(can_enter(&w, &p.with_zone_kind(ZoneKind::Destroyer), c), MoveType::Destroyable);
    }
}

// ── Properties ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use proptest::prelude::*;
    use rg_core::{CellCoord, CellId};
    use rg_grid::{Grid, Overlay, World};
    use crate::{can_enter, EdgeFollower, PathQuery, Pathfinder};
    use super::helpers::profile;

    proptest! {
        #[test]
        fn open_grid_paths_are_chebyshev(
            w in 2u32..24, h in 2u32..24,
            a in any::<(u32, u32)>(), b in any::<(u32, u32)>(),
        ) {
            let world = World::new(Grid::new(w, h).unwrap());
            let from = CellCoord::new((a.0 % w) as i32, (a.1 % h) as i32);
            let to = CellCoord::new((b.0 % w) as i32, (b.1 % h) as i32);
            let q = PathQuery::new(
                world.grid.cell_id(from).unwrap(),
                world.grid.cell_id(to).unwrap(),
                profile(),
            );
            let path = EdgeFollower::default().find_path(&world, &q).unwrap();
            prop_assert_eq!(path.len() as u32, from.chebyshev(to));
        }

        #[test]
        fn cluttered_grids_are_deterministic_and_sound(
            walls in proptest::collection::vec(0u32..256, 0..80),
            from in 0u32..256, to in 0u32..256,
        ) {
            let mut grid = Grid::new(16, 16).unwrap();
            grid.set_overlays(
                walls.iter().filter(|&&c| c != from && c != to).map(|&c| (CellId(c), Overlay::Concrete)),
            ).unwrap();
            let world = World::new(grid);
            let q = PathQuery::new(CellId(from), CellId(to), profile());

            let first = EdgeFollower::default().find_path(&world, &q);
            let second = EdgeFollower::default().find_path(&world, &q);
            prop_assert_eq!(&first, &second);

            if let Ok(path) = first {
                let cells = path.cells(&world.grid);
                prop_assert_eq!(cells.len(), path.len());
                prop_assert_eq!(cells.last().copied().unwrap_or(path.start), path.end);
                prop_assert_eq!(path.complete, path.end == CellId(to));
                for c in cells {
                    prop_assert_ne!(can_enter(&world, &q.profile, c), rg_core::MoveType::No);
                }
            }
        }
    }
}
