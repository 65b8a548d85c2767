use alloc::string::{String, ToString};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Complete,
}

impl RunState {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Drives a run: owns the game state, decides when ticks apply and reports to an [`EventSink`].
///
/// The controller does not own a timer. Whoever hosts it should call [`TickController::tick`]
/// every [`TickController::interval`] while [`TickController::is_running`] holds, and stop as soon
/// as it does not. Ticks outside a run are ignored, so a late timer firing is harmless.
#[derive(Clone, Debug)]
pub struct TickController<S> {
    game: GameState<S>,
    state: RunState,
    started_at: Option<Instant>,
    last_summary: Option<RunSummary>,
}

impl<S: ScoreStore> TickController<S> {
    pub fn new(config: LevelConfig, store: S, seed: u64) -> Self {
        Self {
            game: GameState::new(config, store, seed),
            state: Default::default(),
            started_at: None,
            last_summary: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn game(&self) -> &GameState<S> {
        &self.game
    }

    pub fn config(&self) -> &LevelConfig {
        self.game.config()
    }

    pub fn interval(&self) -> Duration {
        self.game.config().interval()
    }

    pub fn alive_count(&self) -> CellCount {
        self.game.alive_count()
    }

    pub fn store(&self) -> &S {
        self.game.store()
    }

    /// Summary of the most recently completed run.
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    /// Labels every cell with its 1-based position and clears elimination marks.
    pub fn init_board(&self, events: &mut impl EventSink) {
        for cell in 0..self.game.total_cells() {
            events.emit(GameEvent::CellUpdated {
                cell_index: cell,
                display_text: (cell + 1).to_string(),
                eliminated: false,
            });
        }
    }

    /// Begins a fresh run. Returns `false` if one is already running.
    pub fn start(&mut self, now: Instant, events: &mut impl EventSink) -> bool {
        if self.state.is_running() {
            log::debug!("start ignored, run already in progress");
            return false;
        }

        self.init_board(events);
        self.game.init();
        self.started_at = Some(now);
        self.last_summary = None;
        self.state = RunState::Running;
        log::debug!(
            "run started: {} ({} cells)",
            self.config().identity_key(),
            self.game.total_cells()
        );

        events.emit(GameEvent::NextTarget {
            label: self.game.alive_count(),
            first: true,
        });
        true
    }

    /// Refreshes every alive cell. Dead cells keep their elimination state.
    pub fn tick(&mut self, events: &mut impl EventSink) {
        if !self.state.is_running() {
            log::trace!("tick outside of a run ignored");
            return;
        }

        for cell in 0..self.game.total_cells() {
            let display_text = match self.game.assign_display(cell) {
                CellRoll::Dead => continue,
                CellRoll::Hidden(_) => String::new(),
                CellRoll::Shown(value) => value.to_string(),
            };
            events.emit(GameEvent::CellUpdated {
                cell_index: cell,
                display_text,
                eliminated: false,
            });
        }
    }

    /// Forwards a tap on `cell`, which was showing `shown` (`None` when blank).
    ///
    /// Misses are silent. Panics if `cell` is outside the grid.
    pub fn on_tap(
        &mut self,
        cell: CellCount,
        shown: Option<CellCount>,
        now: Instant,
        events: &mut impl EventSink,
    ) -> TapOutcome {
        assert!(
            cell < self.game.total_cells(),
            "cell {cell} outside of {} cells",
            self.game.total_cells()
        );

        if !self.state.is_running() {
            log::trace!("tap on {cell} ignored, state {:?}", self.state);
            return TapOutcome::Ignored;
        }

        let outcome = self.game.resolve_tap(shown, cell);
        log::trace!("tap on {cell} showing {shown:?}: {outcome:?}");

        if outcome.is_hit() {
            events.emit(GameEvent::CellUpdated {
                cell_index: cell,
                display_text: shown.map(|value| value.to_string()).unwrap_or_default(),
                eliminated: true,
            });

            if self.game.is_complete() {
                self.finish(now, events);
            } else {
                events.emit(GameEvent::NextTarget {
                    label: self.game.alive_count(),
                    first: false,
                });
            }
        }

        outcome
    }

    fn finish(&mut self, now: Instant, events: &mut impl EventSink) {
        self.state = RunState::Complete;
        let elapsed = self
            .started_at
            .take()
            .map(|started_at| now.saturating_duration_since(started_at))
            .unwrap_or_default();

        let summary = RunSummary::new(self.game.evaluate(elapsed));
        if summary.message_category.should_persist() {
            let key = self.config().identity_key();
            log::info!("new best for {}: {}", key, summary.evaluation.score);
            self.game.save_best(&key, summary.evaluation.score);
        }
        log::debug!(
            "run complete: score {} in {} ({:?})",
            summary.evaluation.score,
            summary.elapsed_label,
            summary.message_category
        );

        events.emit(GameEvent::RunComplete(summary.clone()));
        self.last_summary = Some(summary);
    }

    /// Stops ticking without touching the game state. Returns whether a run was interrupted.
    pub fn suspend(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        log::debug!("run suspended with {} cells alive", self.game.alive_count());
        self.state = RunState::Idle;
        self.started_at = None;
        true
    }

    /// Swaps in a new difficulty and resets the board for it. Any run in progress is dropped.
    pub fn reconfigure(&mut self, config: LevelConfig, events: &mut impl EventSink) {
        self.suspend();
        log::debug!("reconfigured: {}", config.identity_key());
        self.game.set_config(config);
        self.state = RunState::Idle;
        self.init_board(events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn controller() -> TickController<MemoryStore> {
        let config = LevelConfig::new(3, 500, 50.0).unwrap();
        TickController::new(config, MemoryStore::new(), 42)
    }

    /// Hits every cell in order, finishing `elapsed` after `t0`.
    fn play_through(
        controller: &mut TickController<MemoryStore>,
        t0: Instant,
        elapsed: Duration,
        events: &mut Vec<GameEvent>,
    ) {
        for cell in 0..controller.game().total_cells() {
            let target = controller.alive_count();
            let outcome = controller.on_tap(cell, Some(target), t0 + elapsed, events);
            assert_eq!(outcome, TapOutcome::Hit);
        }
    }

    fn run_summary(events: &[GameEvent]) -> &RunSummary {
        let mut summaries = events.iter().filter_map(|event| match event {
            GameEvent::RunComplete(summary) => Some(summary),
            _ => None,
        });
        let summary = summaries.next().expect("run should complete");
        assert!(summaries.next().is_none());
        summary
    }

    #[test]
    fn start_relabels_board_and_names_first_target() {
        let mut controller = controller();
        let mut events = Vec::new();

        assert!(controller.start(Instant::now(), &mut events));

        assert_eq!(controller.state(), RunState::Running);
        assert_eq!(events.len(), 10);
        assert_eq!(
            events[8],
            GameEvent::CellUpdated {
                cell_index: 8,
                display_text: "9".to_string(),
                eliminated: false,
            }
        );
        assert_eq!(
            events[9],
            GameEvent::NextTarget {
                label: 9,
                first: true
            }
        );
    }

    #[test]
    fn duplicate_start_is_a_no_op() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        controller.on_tap(0, Some(9), t0, &mut events);
        events.clear();

        assert!(!controller.start(t0, &mut events));
        assert!(events.is_empty());
        assert_eq!(controller.alive_count(), 8);
    }

    #[test]
    fn tick_skips_dead_cells() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        controller.on_tap(4, Some(9), t0, &mut events);
        events.clear();

        controller.tick(&mut events);

        assert_eq!(events.len(), 8);
        for event in &events {
            let GameEvent::CellUpdated {
                cell_index,
                display_text,
                eliminated,
            } = event
            else {
                panic!("unexpected event {event:?}");
            };
            assert_ne!(*cell_index, 4);
            assert!(!eliminated);
            if !display_text.is_empty() {
                let value: CellCount = display_text.parse().unwrap();
                assert!((1..=8).contains(&value));
            }
        }
    }

    #[test]
    fn tick_outside_a_run_does_nothing() {
        let mut controller = controller();
        let mut events = Vec::new();
        controller.tick(&mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn hit_marks_cell_and_names_next_target() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        events.clear();

        assert_eq!(
            controller.on_tap(2, Some(9), t0, &mut events),
            TapOutcome::Hit
        );
        assert_eq!(
            events,
            [
                GameEvent::CellUpdated {
                    cell_index: 2,
                    display_text: "9".to_string(),
                    eliminated: true,
                },
                GameEvent::NextTarget {
                    label: 8,
                    first: false
                },
            ]
        );
    }

    #[test]
    fn miss_is_silent() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        events.clear();

        assert_eq!(
            controller.on_tap(2, Some(3), t0, &mut events),
            TapOutcome::Miss
        );
        assert_eq!(controller.on_tap(3, None, t0, &mut events), TapOutcome::Miss);
        assert!(events.is_empty());
        assert_eq!(controller.state(), RunState::Running);
        assert_eq!(controller.game().tap_count(), 2);
    }

    #[test]
    fn taps_outside_a_run_are_ignored() {
        let mut controller = controller();
        let mut events = Vec::new();

        assert_eq!(
            controller.on_tap(0, Some(9), Instant::now(), &mut events),
            TapOutcome::Ignored
        );
        assert_eq!(controller.game().tap_count(), 0);
        assert!(events.is_empty());
    }

    #[test]
    #[should_panic]
    fn tap_outside_the_grid_panics() {
        let mut controller = controller();
        let mut events = Vec::new();
        controller.start(Instant::now(), &mut events);
        controller.on_tap(9, Some(9), Instant::now(), &mut events);
    }

    #[test]
    fn first_run_is_persisted() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        play_through(
            &mut controller,
            t0,
            Duration::from_millis(42_300),
            &mut events,
        );

        let summary = run_summary(&events);
        assert_eq!(summary.message_category, MessageCategory::FirstAttempt);
        assert_eq!(summary.evaluation.previous_best, None);
        assert_eq!(summary.evaluation.score, 100.0);
        assert_eq!(summary.elapsed_label, "00:42.30");
        assert_eq!(controller.state(), RunState::Complete);
        assert!(!controller.is_running());
        assert_eq!(controller.store().get("NB_3_500_50"), Some(100.0));
        assert_eq!(controller.last_summary(), Some(summary));

        events.clear();
        controller.start(t0, &mut events);
        assert_eq!(controller.last_summary(), None);
    }

    #[test]
    fn only_improvements_are_persisted() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        play_through(
            &mut controller,
            t0,
            Duration::from_millis(42_300),
            &mut events,
        );

        events.clear();
        controller.start(t0, &mut events);
        play_through(
            &mut controller,
            t0,
            Duration::from_millis(84_600),
            &mut events,
        );
        let summary = run_summary(&events);
        assert_eq!(summary.message_category, MessageCategory::NoImprovement);
        assert_eq!(summary.evaluation.previous_best, Some(100.0));
        assert_eq!(summary.evaluation.score, 50.0);
        assert_eq!(controller.store().get("NB_3_500_50"), Some(100.0));

        events.clear();
        controller.start(t0, &mut events);
        play_through(
            &mut controller,
            t0,
            Duration::from_millis(21_150),
            &mut events,
        );
        let summary = run_summary(&events);
        assert_eq!(summary.message_category, MessageCategory::NewRecord);
        assert_eq!(summary.evaluation.score, 200.0);
        assert_eq!(controller.store().get("NB_3_500_50"), Some(200.0));
    }

    #[test]
    fn suspend_then_start_resets_progress() {
        let mut controller = controller();
        let t0 = Instant::now();
        let mut events = Vec::new();
        controller.start(t0, &mut events);
        controller.on_tap(0, Some(9), t0, &mut events);
        controller.on_tap(1, Some(8), t0, &mut events);

        assert!(controller.suspend());
        assert!(!controller.suspend());
        assert_eq!(controller.state(), RunState::Idle);
        assert_eq!(controller.alive_count(), 7);

        events.clear();
        controller.tick(&mut events);
        assert!(events.is_empty());

        assert!(controller.start(t0, &mut events));
        assert_eq!(controller.alive_count(), 9);
        assert_eq!(controller.game().tap_count(), 0);
        assert_eq!(controller.game().cell_status(0), CellStatus::Alive);
    }

    #[test]
    fn reconfigure_resizes_the_board() {
        let mut controller = controller();
        let mut events = Vec::new();
        controller.start(Instant::now(), &mut events);
        events.clear();

        controller.reconfigure(LevelConfig::new(4, 1000, 75.0).unwrap(), &mut events);

        assert_eq!(controller.state(), RunState::Idle);
        assert_eq!(controller.alive_count(), 16);
        assert_eq!(controller.interval(), Duration::from_millis(1000));
        assert_eq!(events.len(), 16);
    }
}
