//! Simulation configuration.
//!
//! Every field has a default matching the classic tuning, so a TOML file only
//! needs the keys it wants to change:
//!
//! ```toml
//! total_ticks = 600
//! seed        = 7
//!
//! [path]
//! max_path_len = 120
//!
//! [drive]
//! retry_limit       = 4
//! retry_delay_ticks = 8
//! ```

use crate::MoveType;
#[cfg(feature = "serde")]
use crate::{CoreError, CoreResult};

// ── PathLimits ────────────────────────────────────────────────────────────────

/// Bounds on a single path search.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathLimits {
    /// Capacity of the search buffer.  A longer route is returned one
    /// segment at a time; only an obstacle detour that cannot fit fails with
    /// `LengthExceeded`.
    pub max_path_len: usize,

    /// Cells one edge-follow pass may visit before giving up.
    pub edge_follow_visits: usize,

    /// Registrations allowed across the whole search, all passes included.
    pub visit_budget: usize,

    /// How many obstacles past the first one the search may scan through
    /// when neither rotational sense can reach the far side.
    pub obstacle_rescans: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_path_len:       200,
            edge_follow_visits: 400,
            visit_budget:       4_000,
            obstacle_rescans:   5,
        }
    }
}

// ── DriveRules ────────────────────────────────────────────────────────────────

/// Mover tuning: how much of a route is kept, how failures are retried.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveRules {
    /// Facings a mover keeps from each computed route.  When they run out
    /// before the destination the mover replans.
    pub path_window: usize,

    /// Failed attempts tolerated before "unable to comply".
    pub retry_limit: u32,

    /// Ticks to wait in `Blocked` after a failed path request.
    pub retry_delay_ticks: u32,

    /// A failed request within this many cells of the destination counts as
    /// arrival.
    pub close_enough: u32,

    /// Highest `MoveType` the threshold escalation may reach.
    pub max_threshold: MoveType,
}

impl Default for DriveRules {
    fn default() -> Self {
        Self {
            path_window:       12,
            retry_limit:       10,
            retry_delay_ticks: 15,
            close_enough:      1,
            max_threshold:     MoveType::Temp,
        }
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Total ticks for `Sim::run`.
    pub total_ticks: u64,

    /// Master seed for scenario generation.
    pub seed: u64,

    /// Logic frames per game second.
    pub ticks_per_second: u32,

    /// Observer snapshot every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,

    pub path: PathLimits,

    pub drive: DriveRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_ticks:           900,
            seed:                  0,
            ticks_per_second:      15,
            output_interval_ticks: 1,
            path:                  PathLimits::default(),
            drive:                 DriveRules::default(),
        }
    }
}

impl SimConfig {
    /// The tick at which `Sim::run` stops (exclusive).
    #[inline]
    pub fn end_tick(&self) -> crate::Tick {
        crate::Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> crate::SimClock {
        crate::SimClock::new(self.ticks_per_second)
    }

    /// Reject settings the movement core cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if self.path.max_path_len == 0 {
            return Err("path.max_path_len must be at least 1".into());
        }
        if self.drive.path_window == 0 {
            return Err("drive.path_window must be at least 1".into());
        }
        if self.drive.max_threshold == MoveType::No {
            return Err("drive.max_threshold cannot be `No`".into());
        }
        if self.ticks_per_second == 0 {
            return Err("ticks_per_second must be at least 1".into());
        }
        Ok(())
    }

    /// Parse a TOML document; missing keys take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: SimConfig =
            toml::from_str(content).map_err(|e| CoreError::Parse(e.to_string()))?;
        config.validate().map_err(CoreError::Config)?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    #[cfg(feature = "serde")]
    pub fn load(path: &std::path::Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
