use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;
use rand::prelude::*;
use rand::rngs::SmallRng;

use crate::evaluation::round_half_up;
use crate::*;

/// Live population of a run: which cells are alive, the current maximum, and the tap tally.
///
/// Owns the RNG that picks display values and the store holding personal bests.
#[derive(Clone, Debug)]
pub struct GameState<S> {
    config: LevelConfig,
    store: S,
    rng: SmallRng,
    alive_count: CellCount,
    tap_count: u32,
    cell_status: Vec<CellStatus>,
}

impl<S: ScoreStore> GameState<S> {
    pub fn new(config: LevelConfig, store: S, seed: u64) -> Self {
        let mut state = Self {
            config,
            store,
            rng: SmallRng::seed_from_u64(seed),
            alive_count: 0,
            tap_count: 0,
            cell_status: Vec::new(),
        };
        state.init();
        state
    }

    /// Resets to a fresh run: every cell alive, no taps.
    pub fn init(&mut self) {
        let total = self.config.total_cells();
        self.alive_count = total;
        self.tap_count = 0;
        self.cell_status = vec![CellStatus::Alive; usize::from(total)];
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Replaces the difficulty and resets. Only meant to be used between runs.
    pub fn set_config(&mut self, config: LevelConfig) {
        self.config = config;
        self.init();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn alive_count(&self) -> CellCount {
        self.alive_count
    }

    pub fn tap_count(&self) -> u32 {
        self.tap_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.config.total_cells()
    }

    pub fn cell_status(&self, cell: CellCount) -> CellStatus {
        self.cell_status[usize::from(cell)]
    }

    pub fn is_complete(&self) -> bool {
        self.alive_count == 0
    }

    /// Picks what `cell` shows this tick.
    ///
    /// Alive cells draw a fresh value uniform over `1..=alive_count` and pass the display roll
    /// with the configured probability. Panics if `cell` is out of range.
    pub fn assign_display(&mut self, cell: CellCount) -> CellRoll {
        if !self.cell_status(cell).is_alive() {
            return CellRoll::Dead;
        }

        let visible = self.rng.random_bool(self.config.probability_pct() / 100.0);
        let value = self.rng.random_range(1..=self.alive_count);
        if visible {
            CellRoll::Shown(value)
        } else {
            CellRoll::Hidden(value)
        }
    }

    /// Adjudicates a tap on `cell` that was showing `shown` (`None` for a blank cell).
    ///
    /// Every tap counts towards the tally. Only a tap on an alive cell showing the current
    /// maximum is a hit. Panics if `cell` is out of range.
    pub fn resolve_tap(&mut self, shown: Option<CellCount>, cell: CellCount) -> TapOutcome {
        let index = usize::from(cell);
        assert!(
            index < self.cell_status.len(),
            "cell {cell} outside of {} cells",
            self.cell_status.len()
        );

        self.tap_count = self.tap_count.saturating_add(1);

        let hit = self.cell_status[index].is_alive()
            && self.alive_count > 0
            && shown == Some(self.alive_count);
        if hit {
            self.alive_count -= 1;
            self.cell_status[index] = CellStatus::Dead;
            TapOutcome::Hit
        } else {
            TapOutcome::Miss
        }
    }

    /// Scores a finished run that took `elapsed`.
    ///
    /// Panics if cells are still alive.
    pub fn evaluate(&self, elapsed: Duration) -> Evaluation {
        assert!(
            self.is_complete(),
            "evaluate called with {} cells still alive",
            self.alive_count
        );

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let hit_rate = f64::from(self.tap_count) / f64::from(self.total_cells());
        // a zero-length run would divide by zero
        let raw = 1000.0 * self.config.expected_duration_ms() / (elapsed_ms.max(1.0) * hit_rate);
        let score = round_half_up(raw) / 10.0;

        Evaluation {
            score,
            previous_best: self.load_best(&self.config.identity_key()),
            elapsed_ms,
            hit_rate,
        }
    }

    pub fn load_best(&self, key: &str) -> Option<f64> {
        self.store.get(key)
    }

    /// Records `score` unconditionally, eligibility is the caller's call.
    pub fn save_best(&mut self, key: &str, score: f64) {
        self.store.set(key, score);
    }
}
