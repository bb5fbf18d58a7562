//! Session module - one player's run through a game mode
//!
//! A session ties the grid engine, level catalog, mode rules, undo history and
//! progress store together. It processes one [`GameCommand`] at a time to
//! completion and reports what happened as a list of [`SessionEvent`]s.
//!
//! State machine:
//!
//! ```text
//! Selecting --select--> Playing --win/lose--> Resolved --next/retry/select--> Playing
//!     \                    \                      \
//!      `------------------- `---------home-------- `--> Exited
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{Clock, Stopwatch, SystemClock};
use crate::grid::{apply_move, initial_grid, spawn_tile, Grid};
use crate::history::{History, HistoryEntry};
use crate::levels::{Catalog, LevelDef};
use crate::progress::ProgressStore;
use crate::rng::SimpleRng;
use crate::rules::{Budget, Evaluation, LoseReason, ModeRules, Outcome};
use crate::snapshot::SessionSnapshot;
use crate::targets::TargetProgress;
use crate::types::{
    Cell, Direction, GameCommand, GameMode, ACHIEVEMENT_TILE, DEFAULT_HISTORY_CAPACITY,
};

/// Session tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Undo depth (0 disables undo)
    pub history_capacity: usize,
    /// Fixed RNG seed; None seeds from the wall clock
    pub seed: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No level chosen yet
    Selecting,
    /// Grid active, accepting moves
    Playing,
    /// Level won or lost; waiting for next/retry/select/home
    Resolved { outcome: Outcome },
    /// Left the mode
    Exited,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    LevelStarted { level: u32 },
    Moved { direction: Direction, gained: u32 },
    TileMerged { value: Cell },
    TileSpawned { row: usize, col: usize, value: Cell },
    /// Classic only, once per attempt
    Reached2048,
    NewHighScore { score: u32 },
    LevelComplete { level: u32, final_level: bool, replay: bool },
    LevelUnlocked { level: u32 },
    GameOver { reason: LoseReason },
    Undone,
    Restarted,
    Exited,
}

#[derive(Debug)]
pub struct Session<S: ProgressStore> {
    mode: GameMode,
    state: SessionState,
    level: Option<u32>,
    rules: Option<ModeRules>,
    grid: Grid,
    score: u32,
    moves_used: u32,
    history: History,
    targets: TargetProgress,
    achieved_2048: bool,
    stopwatch: Stopwatch,
    clock: Box<dyn Clock>,
    rng: SimpleRng,
    store: S,
}

impl<S: ProgressStore> Session<S> {
    /// Create a session on the wall clock, starting in `Selecting`
    pub fn new(mode: GameMode, store: S, config: SessionConfig) -> Self {
        Self::with_clock(mode, store, config, Box::new(SystemClock::new()))
    }

    pub fn with_clock(
        mode: GameMode,
        store: S,
        config: SessionConfig,
        clock: Box<dyn Clock>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => SimpleRng::new(seed),
            None => SimpleRng::from_entropy(),
        };

        Self {
            mode,
            state: SessionState::Selecting,
            level: None,
            rules: None,
            grid: Grid::new(),
            score: 0,
            moves_used: 0,
            history: History::new(config.history_capacity),
            targets: TargetProgress::default(),
            achieved_2048: false,
            stopwatch: Stopwatch::new(),
            clock,
            rng,
            store,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn level(&self) -> Option<u32> {
        self.level
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    pub fn targets(&self) -> &TargetProgress {
        &self.targets
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn high_score(&self) -> u32 {
        self.store.high_score(self.mode)
    }

    /// Elapsed play time of the current level in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.stopwatch.elapsed(self.clock.as_ref()).as_millis() as u64
    }

    pub fn budget(&self) -> Budget {
        match self.rules {
            Some(rules) => rules.budget(self.moves_used, self.elapsed_ms()),
            None => Budget::Unlimited,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.mode.supports_undo() && self.undo_allowed_in_state() && !self.history.is_empty()
    }

    /// Levels the player may pick on the level-select screen
    pub fn unlocked_levels(&self) -> std::ops::RangeInclusive<u32> {
        Catalog::selectable_levels(self.mode, self.store.unlocked_level(self.mode))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            level: self.level,
            state: self.state,
            grid: self.grid,
            score: self.score,
            high_score: self.high_score(),
            moves_used: self.moves_used,
            budget: self.budget(),
            can_undo: self.can_undo(),
            targets: self.targets.clone(),
        }
    }

    /// Apply a command
    pub fn apply(&mut self, command: GameCommand) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if self.state == SessionState::Exited {
            debug!(?command, "session exited; command ignored");
            return events;
        }

        match command {
            GameCommand::Move(direction) => self.step(direction, &mut events),
            GameCommand::Undo => self.undo(&mut events),
            GameCommand::Restart | GameCommand::Retry => {
                if matches!(
                    self.state,
                    SessionState::Playing | SessionState::Resolved { .. }
                ) {
                    self.restart(&mut events);
                }
            }
            GameCommand::NextLevel => self.next_level(&mut events),
            GameCommand::SelectLevel(level) => self.select_level(level, &mut events),
            GameCommand::Home => {
                self.stopwatch.stop(self.clock.as_ref());
                self.state = SessionState::Exited;
                events.push(SessionEvent::Exited);
                info!(mode = self.mode.as_str(), "session exited");
            }
        }

        events
    }

    /// Sample the clock without input; resolves a Swift level whose time ran out
    pub fn poll(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.state != SessionState::Playing {
            return events;
        }
        let Some(rules) = self.rules else {
            return events;
        };

        let elapsed_ms = self.elapsed_ms();
        if let Some(outcome) = rules.on_budget(self.evaluation(elapsed_ms)) {
            self.resolve(outcome, &mut events);
        }
        events
    }

    fn evaluation(&self, elapsed_ms: u64) -> Evaluation<'_> {
        Evaluation {
            grid: &self.grid,
            score: self.score,
            moves_used: self.moves_used,
            elapsed_ms,
        }
    }

    fn step(&mut self, direction: Direction, events: &mut Vec<SessionEvent>) {
        if self.state != SessionState::Playing {
            return;
        }
        let Some(rules) = self.rules else {
            return;
        };

        // One sample per evaluation cycle.
        let elapsed_ms = self.elapsed_ms();
        if !rules.budget_allows_move(self.moves_used, elapsed_ms) {
            if let Some(outcome) = rules.on_budget(self.evaluation(elapsed_ms)) {
                self.resolve(outcome, events);
            }
            return;
        }

        let result = apply_move(&self.grid, direction);
        if !result.moved {
            debug!(direction = direction.as_str(), "move did not change the grid");
            return;
        }

        if self.mode.supports_undo() {
            self.history.push(HistoryEntry {
                grid: self.grid,
                score: self.score,
                moves_used: self.moves_used,
                targets: self.targets.clone(),
            });
        }

        self.grid = result.grid;
        self.score = self.score.saturating_add(result.gained);
        self.moves_used += 1;
        events.push(SessionEvent::Moved {
            direction,
            gained: result.gained,
        });
        events.extend(
            result
                .merges
                .iter()
                .map(|&value| SessionEvent::TileMerged { value }),
        );
        self.targets.record_merges(&result.merges);

        if let Some((row, col)) = spawn_tile(&mut self.grid, &mut self.rng) {
            let value = self.grid.get(row, col).unwrap_or(0);
            events.push(SessionEvent::TileSpawned { row, col, value });
        }
        self.targets.refresh(&self.grid);

        debug!(
            direction = direction.as_str(),
            gained = result.gained,
            score = self.score,
            moves_used = self.moves_used,
            "move applied"
        );

        self.record_high_score(events);

        if self.mode == GameMode::Classic
            && !self.achieved_2048
            && self.grid.max_tile() >= ACHIEVEMENT_TILE
        {
            self.achieved_2048 = true;
            events.push(SessionEvent::Reached2048);
            info!(score = self.score, "reached 2048");
        }

        if let Some(outcome) = rules.after_move(self.evaluation(elapsed_ms)) {
            self.resolve(outcome, events);
        }
    }

    fn record_high_score(&mut self, events: &mut Vec<SessionEvent>) {
        if self.score > self.store.high_score(self.mode) {
            self.store.set_high_score(self.mode, self.score);
            events.push(SessionEvent::NewHighScore { score: self.score });
        }
    }

    fn resolve(&mut self, outcome: Outcome, events: &mut Vec<SessionEvent>) {
        let Some(level) = self.level else {
            return;
        };

        self.stopwatch.stop(self.clock.as_ref());
        self.state = SessionState::Resolved { outcome };

        match outcome {
            Outcome::Win => {
                let final_level = Catalog::is_final_level(self.mode, level);
                let replay = self.store.is_level_completed(self.mode, level);

                if !final_level && level + 1 > self.store.unlocked_level(self.mode) {
                    self.store.unlock_level(self.mode, level);
                    events.push(SessionEvent::LevelUnlocked { level: level + 1 });
                    info!(mode = self.mode.as_str(), level = level + 1, "level unlocked");
                }

                events.push(SessionEvent::LevelComplete {
                    level,
                    final_level,
                    replay,
                });
                info!(
                    mode = self.mode.as_str(),
                    level,
                    score = self.score,
                    moves_used = self.moves_used,
                    "level complete"
                );
            }
            Outcome::Lose(reason) => {
                events.push(SessionEvent::GameOver { reason });
                info!(
                    mode = self.mode.as_str(),
                    level,
                    ?reason,
                    score = self.score,
                    "game over"
                );
            }
        }
    }

    fn undo_allowed_in_state(&self) -> bool {
        match self.state {
            SessionState::Playing => true,
            // The Classic game-over popup still offers undo.
            SessionState::Resolved {
                outcome: Outcome::Lose(_),
            } => self.mode == GameMode::Classic,
            _ => false,
        }
    }

    fn undo(&mut self, events: &mut Vec<SessionEvent>) {
        if !self.mode.supports_undo() || !self.undo_allowed_in_state() {
            return;
        }
        let Some(entry) = self.history.pop() else {
            return;
        };

        self.grid = entry.grid;
        self.score = entry.score;
        self.moves_used = entry.moves_used;
        self.targets = entry.targets;
        self.state = SessionState::Playing;
        events.push(SessionEvent::Undone);
        debug!(score = self.score, remaining = self.history.len(), "undo");
    }

    fn restart(&mut self, events: &mut Vec<SessionEvent>) {
        let Some(level) = self.level else {
            return;
        };
        if let Some(def) = Catalog::level(self.mode, level) {
            self.start_level(level, def, events);
            events.push(SessionEvent::Restarted);
        }
    }

    fn next_level(&mut self, events: &mut Vec<SessionEvent>) {
        let SessionState::Resolved {
            outcome: Outcome::Win,
        } = self.state
        else {
            return;
        };
        let Some(level) = self.level else {
            return;
        };
        if Catalog::is_final_level(self.mode, level) {
            return;
        }

        match Catalog::level(self.mode, level + 1) {
            Some(def) => self.start_level(level + 1, def, events),
            None => self.back_to_selection(),
        }
    }

    fn select_level(&mut self, level: u32, events: &mut Vec<SessionEvent>) {
        if !matches!(
            self.state,
            SessionState::Selecting | SessionState::Resolved { .. }
        ) {
            return;
        }

        let Some(def) = Catalog::level(self.mode, level) else {
            warn!(mode = self.mode.as_str(), level, "level not in catalog");
            self.back_to_selection();
            return;
        };

        if !self.unlocked_levels().contains(&level) {
            warn!(mode = self.mode.as_str(), level, "level is locked");
            self.back_to_selection();
            return;
        }

        self.start_level(level, def, events);
    }

    fn back_to_selection(&mut self) {
        self.stopwatch.stop(self.clock.as_ref());
        self.state = SessionState::Selecting;
        self.level = None;
        self.rules = None;
        self.history.clear();
    }

    fn start_level(&mut self, level: u32, def: LevelDef, events: &mut Vec<SessionEvent>) {
        let rules = ModeRules::from(def);

        self.level = Some(level);
        self.rules = Some(rules);
        self.grid = initial_grid(&mut self.rng);
        self.score = 0;
        self.moves_used = 0;
        self.history.clear();
        self.targets = match def {
            LevelDef::Adventure(adventure) => TargetProgress::for_level(adventure),
            _ => TargetProgress::default(),
        };
        self.targets.refresh(&self.grid);
        self.achieved_2048 = false;
        self.stopwatch.reset();
        if rules.is_timed() {
            self.stopwatch.start(self.clock.as_ref());
        }
        self.state = SessionState::Playing;

        events.push(SessionEvent::LevelStarted { level });
        info!(mode = self.mode.as_str(), level, "level started");
    }

    /// Replace the grid of a level in play (test setup)
    #[cfg(test)]
    pub(crate) fn set_grid(&mut self, grid: Grid) {
        self.grid = grid;
        self.targets.refresh(&self.grid);
    }

    #[cfg(test)]
    pub(crate) fn set_moves_used(&mut self, moves_used: u32) {
        self.moves_used = moves_used;
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
