//! Procedural skirmish map for the demo.
//!
//! A river splits the map north to south, crossable only at a few fords.
//! Wall segments, rock clumps and trees are scattered over both banks.  Each
//! house has a base on its own flank and an army ordered to random cells on
//! the enemy flank.  Everything is drawn from `SimRng`, so the seed fixes the
//! whole scenario.

use anyhow::{Context, Result};
use serde::Deserialize;

use rg_core::{CellCoord, CellId, HouseId, Locomotion, ObjectId, SimRng, ZoneKind};
use rg_grid::{Grid, LandType, ObjectKind, Overlay, World};
use rg_path::ThreatMap;

/// The `[scenario]` table of the demo's TOML file.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub width:          u32,
    pub height:         u32,
    pub units_per_side: usize,
    /// Chance that a ground unit is infantry rather than a vehicle.
    pub infantry_share: f64,
    pub fords:          usize,
    pub wall_segments:  usize,
    pub rock_clumps:    usize,
    pub trees:          usize,
    /// Aircraft per side, on top of `units_per_side`.
    pub aircraft:       usize,
    /// Danger limit for house 0's ground units; `None` ignores the threat map.
    pub danger_limit:   Option<u32>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width:          64,
            height:         48,
            units_per_side: 24,
            infantry_share: 0.4,
            fords:          3,
            wall_segments:  10,
            rock_clumps:    14,
            trees:          30,
            aircraft:       2,
            danger_limit:   Some(40),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ScenarioFile {
    scenario: ScenarioConfig,
}

impl ScenarioConfig {
    /// Read the `[scenario]` table; other tables are ignored.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: ScenarioFile = toml::from_str(content).context("parsing [scenario]")?;
        Ok(file.scenario)
    }
}

/// A built scenario, ready for `SimBuilder`.
pub struct Scenario {
    pub world:    World,
    pub orders:   Vec<(ObjectId, CellId)>,
    pub threat:   ThreatMap,
    /// Units that should route around dangerous cells.
    pub cautious: Vec<ObjectId>,
    pub bases:    [ObjectId; 2],
}

const BASE_W: u8 = 3;
const BASE_H: u8 = 2;
/// Radius of the threat halo around house 1's base.
const THREAT_RADIUS: i32 = 6;

pub fn build(cfg: &ScenarioConfig, seed: u64) -> Result<Scenario> {
    let (w, h) = (cfg.width as i32, cfg.height as i32);
    anyhow::ensure!(w >= 16 && h >= 8, "scenario map must be at least 16x8");

    let mut rng = SimRng::new(seed);
    let mut terrain_rng = rng.child(1);
    let mut unit_rng = rng.child(2);

    let river = w / 2;
    let bases = [CellCoord::new(2, h / 2 - 1), CellCoord::new(w - 2 - BASE_W as i32, h / 2 - 1)];
    // Keep obstacles off the river and a margin around each base.
    let reserved = |c: CellCoord| {
        (c.x == river || c.x == river + 1)
            || bases.iter().any(|b| {
                c.x >= b.x - 2 && c.x <= b.x + BASE_W as i32 + 1 && c.y >= b.y - 2 && c.y <= b.y + BASE_H as i32 + 1
            })
    };

    let mut grid = Grid::new(cfg.width, cfg.height)?;
    let at = |grid: &Grid, c: CellCoord| grid.cell_id(c);

    // ── River and fords ───────────────────────────────────────────────────
    let fords: Vec<i32> = (0..cfg.fords).map(|_| terrain_rng.gen_range(1..h - 1)).collect();
    let mut lands = Vec::new();
    for y in 0..h {
        let land = if fords.contains(&y) { LandType::Road } else { LandType::River };
        for x in [river, river + 1] {
            lands.extend(at(&grid, CellCoord::new(x, y)).map(|cell| (cell, land)));
        }
    }

    // ── Rock clumps ───────────────────────────────────────────────────────
    for _ in 0..cfg.rock_clumps {
        let center = CellCoord::new(terrain_rng.gen_range(0..w), terrain_rng.gen_range(0..h));
        for dy in -1..=1 {
            for dx in -1..=1 {
                let c = CellCoord::new(center.x + dx, center.y + dy);
                if reserved(c) || !terrain_rng.gen_bool(0.6) {
                    continue;
                }
                lands.extend(at(&grid, c).map(|cell| (cell, LandType::Rock)));
            }
        }
    }
    grid.set_lands(lands)?;

    // ── Wall segments ─────────────────────────────────────────────────────
    let mut walls = Vec::new();
    for _ in 0..cfg.wall_segments {
        let start = CellCoord::new(terrain_rng.gen_range(0..w), terrain_rng.gen_range(0..h));
        let len = terrain_rng.gen_range(3..9);
        let vertical = terrain_rng.gen_bool(0.5);
        let overlay = if terrain_rng.gen_bool(0.3) { Overlay::Sandbag } else { Overlay::Concrete };
        for i in 0..len {
            let c = if vertical { CellCoord::new(start.x, start.y + i) } else { CellCoord::new(start.x + i, start.y) };
            if !reserved(c) {
                walls.extend(at(&grid, c).map(|cell| (cell, overlay)));
            }
        }
    }
    grid.set_overlays(walls)?;

    let mut world = World::new(grid);

    // ── Trees ─────────────────────────────────────────────────────────────
    for _ in 0..cfg.trees {
        let c = CellCoord::new(terrain_rng.gen_range(0..w), terrain_rng.gen_range(0..h));
        if reserved(c) {
            continue;
        }
        if let Some(cell) = free_ground(&world, c) {
            world.spawn(ObjectKind::Terrain, HouseId(2), cell)?;
        }
    }

    // ── Bases ─────────────────────────────────────────────────────────────
    let base_kind = ObjectKind::Building { width: BASE_W, height: BASE_H };
    let mut base_ids = [ObjectId::INVALID; 2];
    for (house, anchor) in bases.iter().enumerate() {
        let cell = world.grid.try_cell_id(*anchor)?;
        base_ids[house] = world
            .spawn(base_kind, HouseId(house as u8), cell)
            .with_context(|| format!("placing base of house {house}"))?;
    }

    // ── Armies ────────────────────────────────────────────────────────────
    let flank = w / 4;
    let spans = [(0, flank), (w - flank, w)];
    let mut orders = Vec::new();
    let mut cautious = Vec::new();
    for house in 0..2usize {
        let (home, enemy) = (spans[house], spans[1 - house]);
        let total = cfg.units_per_side + cfg.aircraft;
        let mut placed = 0;
        let mut attempts = 0;
        while placed < total && attempts < total * 50 {
            attempts += 1;
            let c = CellCoord::new(unit_rng.gen_range(home.0..home.1), unit_rng.gen_range(0..h));
            let Some(cell) = free_ground(&world, c) else {
                continue;
            };
            let kind = if placed >= cfg.units_per_side {
                ObjectKind::Aircraft
            } else if unit_rng.gen_bool(cfg.infantry_share) {
                ObjectKind::Infantry
            } else {
                ObjectKind::Vehicle
            };
            let id = world.spawn(kind, HouseId(house as u8), cell)?;
            let dest = CellCoord::new(unit_rng.gen_range(enemy.0..enemy.1), unit_rng.gen_range(0..h));
            orders.push((id, world.grid.try_cell_id(dest)?));
            if house == 0 && kind != ObjectKind::Aircraft {
                cautious.push(id);
            }
            placed += 1;
        }
        tracing::debug!(house, placed, attempts, "army placed");
    }

    // ── Threat halo around house 1's base ─────────────────────────────────
    let mut threat = ThreatMap::for_grid(&world.grid);
    let center = bases[1];
    for dy in -THREAT_RADIUS..=THREAT_RADIUS {
        for dx in -THREAT_RADIUS..=THREAT_RADIUS {
            let c = CellCoord::new(center.x + dx, center.y + dy);
            if let Some(cell) = world.grid.cell_id(c) {
                let d = dx.abs().max(dy.abs());
                threat.set(cell, ((THREAT_RADIUS + 1 - d) * 10) as u32);
            }
        }
    }

    Ok(Scenario { world, orders, threat, cautious, bases: base_ids })
}

/// `c` as a cell id if it is on the map, passable for tracks, and empty.
fn free_ground(world: &World, c: CellCoord) -> Option<CellId> {
    let cell = world.grid.cell_id(c)?;
    let clear = world.grid.is_clear_to_move(cell, Locomotion::Track, false, false, None, ZoneKind::Normal);
    (clear && world.grid.cell_occupier(cell).is_none()).then_some(cell)
}
