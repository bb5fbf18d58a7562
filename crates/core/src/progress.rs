//! Progress store contract - unlocked levels and best scores per mode
//!
//! Implementations never fail toward the caller: when storage is unavailable,
//! reads return the defaults (unlocked level 1, best score 0) and writes are
//! dropped. Durable implementations live outside this crate.

use std::collections::HashMap;

use crate::types::GameMode;

/// Default highest unlocked level
pub const DEFAULT_UNLOCKED_LEVEL: u32 = 1;

/// Default best score
pub const DEFAULT_HIGH_SCORE: u32 = 0;

pub trait ProgressStore {
    /// Highest level the player may select (>= 1)
    fn unlocked_level(&self, mode: GameMode) -> u32;

    /// Record completion of `level`: the unlocked level becomes `level + 1`.
    ///
    /// Overwrites unconditionally; callers guard against regressions.
    fn unlock_level(&mut self, mode: GameMode, level: u32);

    fn high_score(&self, mode: GameMode) -> u32;

    /// Overwrite the best score; callers only call this when it is exceeded
    fn set_high_score(&mut self, mode: GameMode, score: u32);

    /// A level below the unlocked level has been completed before
    fn is_level_completed(&self, mode: GameMode, level: u32) -> bool {
        level < self.unlocked_level(mode)
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn unlocked_level(&self, mode: GameMode) -> u32 {
        (**self).unlocked_level(mode)
    }

    fn unlock_level(&mut self, mode: GameMode, level: u32) {
        (**self).unlock_level(mode, level)
    }

    fn high_score(&self, mode: GameMode) -> u32 {
        (**self).high_score(mode)
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) {
        (**self).set_high_score(mode, score)
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for &mut S {
    fn unlocked_level(&self, mode: GameMode) -> u32 {
        (**self).unlocked_level(mode)
    }

    fn unlock_level(&mut self, mode: GameMode, level: u32) {
        (**self).unlock_level(mode, level)
    }

    fn high_score(&self, mode: GameMode) -> u32 {
        (**self).high_score(mode)
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) {
        (**self).set_high_score(mode, score)
    }
}

/// Process-local store (tests, `--memory` runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    unlocked: HashMap<GameMode, u32>,
    high_scores: HashMap<GameMode, u32>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn unlocked_level(&self, mode: GameMode) -> u32 {
        self.unlocked
            .get(&mode)
            .copied()
            .unwrap_or(DEFAULT_UNLOCKED_LEVEL)
    }

    fn unlock_level(&mut self, mode: GameMode, level: u32) {
        self.unlocked.insert(mode, level.saturating_add(1));
    }

    fn high_score(&self, mode: GameMode) -> u32 {
        self.high_scores
            .get(&mode)
            .copied()
            .unwrap_or(DEFAULT_HIGH_SCORE)
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) {
        self.high_scores.insert(mode, score);
    }
}
