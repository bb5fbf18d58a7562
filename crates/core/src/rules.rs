//! Mode rules - win/lose predicates and budgets per game mode
//!
//! Every predicate here is pure; the session decides when to evaluate and what
//! to do with the outcome.
//!
//! Evaluation order after an applied move:
//! - **Classic**: terminal grid loses (play may still undo or retry).
//! - **Adventure**: targets on board win, then an exhausted move budget loses,
//!   then a terminal grid loses.
//! - **Swift**: `score >= target && elapsed <= limit` wins, then `elapsed >= limit`
//!   loses, then a terminal grid loses. Reaching the target exactly at the limit wins.

use serde::Serialize;

use crate::grid::{is_terminal, Grid};
use crate::levels::{AdventureLevel, LevelDef, SwiftLevel};

/// Why a level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoseReason {
    /// Adventure move budget used up with targets unmet
    MovesExhausted,
    /// Swift time budget elapsed below the target score
    TimeUp,
    /// Grid is terminal
    NoMovesLeft,
}

impl LoseReason {
    pub fn message(&self) -> &'static str {
        match self {
            LoseReason::MovesExhausted => "No more moves left!",
            LoseReason::TimeUp => "Time's up!",
            LoseReason::NoMovesLeft => "No more moves possible!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose(LoseReason),
}

/// Remaining resource of the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Budget {
    Unlimited,
    Moves { used: u32, max: u32, remaining: u32 },
    Time { elapsed_ms: u64, limit_ms: u64, remaining_ms: u64 },
}

/// Values a rule needs at one evaluation point
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub grid: &'a Grid,
    pub score: u32,
    pub moves_used: u32,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRules {
    Classic,
    Adventure(&'static AdventureLevel),
    Swift(&'static SwiftLevel),
}

impl From<LevelDef> for ModeRules {
    fn from(def: LevelDef) -> Self {
        match def {
            LevelDef::Classic => ModeRules::Classic,
            LevelDef::Adventure(level) => ModeRules::Adventure(level),
            LevelDef::Swift(level) => ModeRules::Swift(level),
        }
    }
}

impl ModeRules {
    /// Whether a directional input may still be applied
    pub fn budget_allows_move(&self, moves_used: u32, elapsed_ms: u64) -> bool {
        match self {
            ModeRules::Classic => true,
            ModeRules::Adventure(level) => moves_used < level.max_moves,
            ModeRules::Swift(level) => elapsed_ms < level.time_limit_ms(),
        }
    }

    /// Outcome after an applied move, if the level is resolved
    pub fn after_move(&self, eval: Evaluation<'_>) -> Option<Outcome> {
        match self {
            ModeRules::Classic => {
                is_terminal(eval.grid).then_some(Outcome::Lose(LoseReason::NoMovesLeft))
            }
            ModeRules::Adventure(level) => adventure_outcome(level, eval.grid, eval.moves_used),
            ModeRules::Swift(level) => swift_outcome(level, eval.score, eval.elapsed_ms)
                .or_else(|| {
                    is_terminal(eval.grid).then_some(Outcome::Lose(LoseReason::NoMovesLeft))
                }),
        }
    }

    /// Outcome forced by the budget alone (no move applied), e.g. a Swift timeout
    /// observed while polling
    pub fn on_budget(&self, eval: Evaluation<'_>) -> Option<Outcome> {
        if self.budget_allows_move(eval.moves_used, eval.elapsed_ms) {
            return None;
        }
        match self {
            ModeRules::Classic => None,
            ModeRules::Adventure(level) => adventure_outcome(level, eval.grid, eval.moves_used),
            ModeRules::Swift(level) => swift_outcome(level, eval.score, eval.elapsed_ms),
        }
    }

    pub fn budget(&self, moves_used: u32, elapsed_ms: u64) -> Budget {
        match self {
            ModeRules::Classic => Budget::Unlimited,
            ModeRules::Adventure(level) => Budget::Moves {
                used: moves_used,
                max: level.max_moves,
                remaining: level.max_moves.saturating_sub(moves_used),
            },
            ModeRules::Swift(level) => {
                let limit_ms = level.time_limit_ms();
                Budget::Time {
                    elapsed_ms: elapsed_ms.min(limit_ms),
                    limit_ms,
                    remaining_ms: limit_ms.saturating_sub(elapsed_ms),
                }
            }
        }
    }

    pub fn is_timed(&self) -> bool {
        matches!(self, ModeRules::Swift(_))
    }
}

/// Adventure: targets win before the exhausted budget or a stuck grid can lose
pub fn adventure_outcome(level: &AdventureLevel, grid: &Grid, moves_used: u32) -> Option<Outcome> {
    if level.targets_met(grid) {
        return Some(Outcome::Win);
    }
    if moves_used >= level.max_moves {
        return Some(Outcome::Lose(LoseReason::MovesExhausted));
    }
    if is_terminal(grid) {
        return Some(Outcome::Lose(LoseReason::NoMovesLeft));
    }
    None
}

/// Swift: the score target wins if reached no later than the limit
pub fn swift_outcome(level: &SwiftLevel, score: u32, elapsed_ms: u64) -> Option<Outcome> {
    let limit_ms = level.time_limit_ms();
    if score >= level.target_score && elapsed_ms <= limit_ms {
        return Some(Outcome::Win);
    }
    if elapsed_ms >= limit_ms {
        return Some(Outcome::Lose(LoseReason::TimeUp));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::Catalog;

    const STUCK: Grid = Grid::from_rows([[2, 4, 2], [4, 2, 4], [2, 4, 2]]);

    fn eval(grid: &Grid, score: u32, moves_used: u32, elapsed_ms: u64) -> Evaluation<'_> {
        Evaluation {
            grid,
            score,
            moves_used,
            elapsed_ms,
        }
    }

    #[test]
    fn test_adventure_win_any_move_count_below_budget() {
        let level = Catalog::adventure_level(1).unwrap();
        let grid = Grid::from_rows([[16, 2, 16], [4, 32, 8], [16, 2, 16]]);
        for moves in [1, 20, 39] {
            assert_eq!(adventure_outcome(level, &grid, moves), Some(Outcome::Win));
        }
    }

    #[test]
    fn test_adventure_win_checked_before_budget() {
        let level = Catalog::adventure_level(1).unwrap();
        let grid = Grid::from_rows([[16, 2, 16], [4, 32, 8], [16, 2, 16]]);
        assert_eq!(adventure_outcome(level, &grid, 40), Some(Outcome::Win));
    }

    #[test]
    fn test_adventure_budget_exhausted_loses() {
        let level = Catalog::adventure_level(1).unwrap();
        let grid = Grid::from_rows([[16, 2, 0], [4, 32, 8], [16, 2, 16]]);
        assert_eq!(adventure_outcome(level, &grid, 39), None);
        assert_eq!(
            adventure_outcome(level, &grid, 40),
            Some(Outcome::Lose(LoseReason::MovesExhausted))
        );
    }

    #[test]
    fn test_adventure_stuck_grid_loses() {
        let level = Catalog::adventure_level(1).unwrap();
        assert_eq!(
            adventure_outcome(level, &STUCK, 3),
            Some(Outcome::Lose(LoseReason::NoMovesLeft))
        );
    }

    #[test]
    fn test_swift_target_at_limit_wins() {
        let level = Catalog::swift_level(1).unwrap();
        let limit = level.time_limit_ms();
        assert_eq!(swift_outcome(level, 64, limit), Some(Outcome::Win));
    }

    #[test]
    fn test_swift_timeout_below_target_loses() {
        let level = Catalog::swift_level(1).unwrap();
        let limit = level.time_limit_ms();
        assert_eq!(
            swift_outcome(level, 60, limit),
            Some(Outcome::Lose(LoseReason::TimeUp))
        );
        assert_eq!(swift_outcome(level, 60, limit - 1), None);
    }

    #[test]
    fn test_swift_target_after_limit_loses() {
        let level = Catalog::swift_level(1).unwrap();
        let limit = level.time_limit_ms();
        assert_eq!(
            swift_outcome(level, 64, limit + 1),
            Some(Outcome::Lose(LoseReason::TimeUp))
        );
    }

    #[test]
    fn test_swift_stuck_grid_loses_after_move() {
        let rules = ModeRules::Swift(Catalog::swift_level(1).unwrap());
        assert_eq!(
            rules.after_move(eval(&STUCK, 10, 5, 1_000)),
            Some(Outcome::Lose(LoseReason::NoMovesLeft))
        );
        // Target reached on the same move takes precedence.
        assert_eq!(rules.after_move(eval(&STUCK, 64, 5, 1_000)), Some(Outcome::Win));
    }

    #[test]
    fn test_classic_only_loses_on_terminal() {
        let rules = ModeRules::Classic;
        assert_eq!(rules.after_move(eval(&Grid::new(), 0, 500, 0)), None);
        assert_eq!(
            rules.after_move(eval(&STUCK, 0, 0, 0)),
            Some(Outcome::Lose(LoseReason::NoMovesLeft))
        );
        assert!(rules.budget_allows_move(u32::MAX, u64::MAX));
        assert_eq!(rules.budget(3, 0), Budget::Unlimited);
    }

    #[test]
    fn test_on_budget_only_fires_when_exhausted() {
        let rules = ModeRules::Swift(Catalog::swift_level(2).unwrap());
        let grid = Grid::new();
        assert_eq!(rules.on_budget(eval(&grid, 0, 0, 149_999)), None);
        assert_eq!(
            rules.on_budget(eval(&grid, 0, 0, 150_000)),
            Some(Outcome::Lose(LoseReason::TimeUp))
        );
    }

    #[test]
    fn test_budget_reporting() {
        let adventure = ModeRules::Adventure(Catalog::adventure_level(2).unwrap());
        assert_eq!(
            adventure.budget(12, 0),
            Budget::Moves {
                used: 12,
                max: 50,
                remaining: 38
            }
        );

        let swift = ModeRules::Swift(Catalog::swift_level(1).unwrap());
        assert_eq!(
            swift.budget(0, 130_000),
            Budget::Time {
                elapsed_ms: 120_000,
                limit_ms: 120_000,
                remaining_ms: 0
            }
        );
    }
}
