#![no_std]

extern crate alloc;

use alloc::format;
use alloc::string::String;
use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use controller::*;
pub use error::*;
pub use evaluation::*;
pub use events::*;
pub use scorer::*;
pub use storage::*;
pub use types::*;

mod cell;
mod controller;
mod error;
mod evaluation;
mod events;
mod scorer;
mod storage;
mod types;

/// Assumed human reaction latency of the expected-time model, in ms.
///
/// Part of the documented scoring formula, not a tunable.
pub const REACTION_TIME_MS: f64 = 200.0;

/// Difficulty of a run: grid side, refresh interval and per-cell display chance.
///
/// Immutable once built. Changing difficulty means building a new one.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLevelConfig")]
pub struct LevelConfig {
    side: Coord,
    interval_ms: u32,
    probability_pct: f64,
}

/// Unchecked wire form, deserialized configs go through [`LevelConfig::new`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLevelConfig {
    side: Coord,
    interval_ms: u32,
    probability_pct: f64,
}

impl TryFrom<RawLevelConfig> for LevelConfig {
    type Error = GameError;

    fn try_from(raw: RawLevelConfig) -> Result<Self> {
        Self::new(raw.side, raw.interval_ms, raw.probability_pct)
    }
}

impl LevelConfig {
    pub fn new(side: Coord, interval_ms: u32, probability_pct: f64) -> Result<Self> {
        if side < 1 {
            return Err(GameError::InvalidSide);
        }
        if interval_ms < 1 {
            return Err(GameError::InvalidInterval);
        }
        if !(probability_pct > 0.0 && probability_pct <= 100.0) {
            return Err(GameError::InvalidProbability);
        }
        Ok(Self {
            side,
            interval_ms,
            probability_pct,
        })
    }

    /// Builds a config from named form fields.
    ///
    /// Accepts `side`, `interval` (or `intervalMs`) and `probability` (or `probabilityPct`).
    /// Any other name is rejected rather than ignored.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut side = None;
        let mut interval_ms = None;
        let mut probability_pct = None;

        for (name, value) in fields {
            let value = value.trim();
            match name {
                "side" => {
                    side = Some(
                        value
                            .parse::<Coord>()
                            .map_err(|_| GameError::MalformedField("side"))?,
                    )
                }
                "interval" | "intervalMs" => {
                    interval_ms = Some(
                        value
                            .parse::<u32>()
                            .map_err(|_| GameError::MalformedField("interval"))?,
                    )
                }
                "probability" | "probabilityPct" => {
                    probability_pct = Some(
                        value
                            .parse::<f64>()
                            .map_err(|_| GameError::MalformedField("probability"))?,
                    )
                }
                other => return Err(GameError::UnknownField(String::from(other))),
            }
        }

        Self::new(
            side.ok_or(GameError::MissingField("side"))?,
            interval_ms.ok_or(GameError::MissingField("interval"))?,
            probability_pct.ok_or(GameError::MissingField("probability"))?,
        )
    }

    pub const fn side(&self) -> Coord {
        self.side
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms as u64)
    }

    pub const fn probability_pct(&self) -> f64 {
        self.probability_pct
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.side, self.side)
    }

    /// Key under which personal bests for this difficulty are stored.
    pub fn identity_key(&self) -> String {
        format!(
            "NB_{}_{}_{}",
            self.side, self.interval_ms, self.probability_pct
        )
    }

    /// Theoretical time to clear the board under this config, the scoring baseline.
    ///
    /// A single target shown with chance `p` every `T` ms is hit after `T/p - T + D` ms on average.
    /// Clearing high-number-first, the `i`-th remaining number shows with chance `P/i`; summing
    /// over `i = 1..=N` gives `N * (T(N+1)/(2P) - T + D)`.
    pub fn expected_duration_ms(&self) -> f64 {
        let t = f64::from(self.interval_ms);
        let p = self.probability_pct / 100.0;
        let n = f64::from(self.total_cells());
        n * (t * (n + 1.0) / (2.0 * p) - t + REACTION_TIME_MS)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            side: 4,
            interval_ms: 1000,
            probability_pct: 50.0,
        }
    }
}

/// Result of adjudicating one tap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    Hit,
    Miss,
    /// No run is in progress, the tap was not counted.
    Ignored,
}

impl TapOutcome {
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}
