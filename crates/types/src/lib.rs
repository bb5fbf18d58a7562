//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are plain data with no behavior beyond parsing and naming, making them
//! usable in any context (grid engine, session state machine, persistence, drivers).
//!
//! # Grid Dimensions
//!
//! The playfield is a square of `GRID_SIZE` x `GRID_SIZE` cells (3x3).
//! A cell holds `0` (empty) or a positive power of two.
//!
//! # Gameplay Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRID_SIZE` | 3 | Cells per row and per column |
//! | `INITIAL_TILES` | 2 | Tiles spawned on a fresh grid |
//! | `SPAWN_TWO_WEIGHT` | 9 | Out of `SPAWN_WEIGHT_TOTAL`, chance that a spawn is a 2 |
//! | `SPAWN_WEIGHT_TOTAL` | 10 | Denominator for the spawn distribution |
//! | `ACHIEVEMENT_TILE` | 2048 | Tile that triggers the Classic achievement notice |
//! | `DEFAULT_HISTORY_CAPACITY` | 10 | Undo depth when not configured |
//!
//! # Examples
//!
//! ```
//! use strategic_2048_types::{Direction, GameCommand, GameMode, GRID_SIZE};
//!
//! // Parse a direction (case-insensitive, WASD accepted)
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//! assert_eq!(Direction::from_str("w"), Some(Direction::Up));
//!
//! // Storage key of a mode
//! assert_eq!(GameMode::Adventure.as_str(), "adventure");
//!
//! // Parse a command line
//! assert_eq!(GameCommand::from_str("select 2"), Some(GameCommand::SelectLevel(2)));
//! assert_eq!(GameCommand::from_str("dance"), None);
//!
//! assert_eq!(GRID_SIZE, 3);
//! ```

use serde::{Deserialize, Serialize};

/// Cells per row and per column (3x3 grid)
pub const GRID_SIZE: usize = 3;

/// Number of tiles placed on a freshly initialized grid
pub const INITIAL_TILES: usize = 2;

/// Weight of spawning a 2 (out of `SPAWN_WEIGHT_TOTAL`), otherwise a 4 is spawned
pub const SPAWN_TWO_WEIGHT: u32 = 9;

/// Denominator of the spawn distribution
pub const SPAWN_WEIGHT_TOTAL: u32 = 10;

/// Tile value that triggers the one-time Classic achievement notice
pub const ACHIEVEMENT_TILE: u32 = 2048;

/// Default undo depth (number of snapshots kept)
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// A grid cell: `0` for empty, otherwise a positive power of two
pub type Cell = u32;

/// The four move directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions in a stable order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse direction from string
    ///
    /// Accepts full names or WASD letters (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use strategic_2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("right"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("S"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("north"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "a" => Some(Direction::Left),
            "right" | "d" => Some(Direction::Right),
            "up" | "w" => Some(Direction::Up),
            "down" | "s" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Game modes
///
/// - **Classic**: endless play, best score tracked
/// - **Adventure**: create target tiles within a move budget
/// - **Swift**: reach a target score within a time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Classic,
    Adventure,
    Swift,
}

impl GameMode {
    pub const ALL: [GameMode; 3] = [GameMode::Classic, GameMode::Adventure, GameMode::Swift];

    /// Parse mode from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "adventure" => Some(GameMode::Adventure),
            "swift" => Some(GameMode::Swift),
            _ => None,
        }
    }

    /// Persistent key of the mode (used by the progress store)
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Adventure => "adventure",
            GameMode::Swift => "swift",
        }
    }

    /// Whether the mode keeps an undo history
    pub fn supports_undo(&self) -> bool {
        matches!(self, GameMode::Classic | GameMode::Adventure)
    }
}

/// Input commands accepted by a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Slide the grid in a direction
    Move(Direction),
    /// Restore the state before the last applied move
    Undo,
    /// Reinitialize the current level, while playing or after it was resolved
    Restart,
    /// Replay the current level; same effect as `Restart`
    Retry,
    /// Advance to the next level after a win
    NextLevel,
    /// Leave the session (home or quit)
    Home,
    /// Choose a level (1-based) from the level-select screen
    SelectLevel(u32),
}

impl GameCommand {
    /// Parse a command from a text line
    ///
    /// # Examples
    ///
    /// ```
    /// use strategic_2048_types::{Direction, GameCommand};
    ///
    /// assert_eq!(GameCommand::from_str("up"), Some(GameCommand::Move(Direction::Up)));
    /// assert_eq!(GameCommand::from_str("  Undo "), Some(GameCommand::Undo));
    /// assert_eq!(GameCommand::from_str("select 3"), Some(GameCommand::SelectLevel(3)));
    /// assert_eq!(GameCommand::from_str("select"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let head = parts.next()?.to_lowercase();

        let command = match head.as_str() {
            "undo" | "u" => GameCommand::Undo,
            "restart" | "r" => GameCommand::Restart,
            "retry" => GameCommand::Retry,
            "next" => GameCommand::NextLevel,
            "home" | "quit" | "q" | "h" => GameCommand::Home,
            "select" | "level" => {
                let level = parts.next()?.parse().ok()?;
                GameCommand::SelectLevel(level)
            }
            other => GameCommand::Move(Direction::from_str(other)?),
        };

        // Trailing garbage makes the whole line unrecognized.
        if parts.next().is_some() {
            return None;
        }
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_weights() {
        assert!(SPAWN_TWO_WEIGHT < SPAWN_WEIGHT_TOTAL);
        assert_eq!(SPAWN_WEIGHT_TOTAL - SPAWN_TWO_WEIGHT, 1);
    }

    #[test]
    fn test_direction_round_trip_names() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_str(dir.as_str()), Some(dir));
        }
    }

    #[test]
    fn test_mode_keys() {
        for mode in GameMode::ALL {
            assert_eq!(GameMode::from_str(mode.as_str()), Some(mode));
        }
        assert!(GameMode::Classic.supports_undo());
        assert!(GameMode::Adventure.supports_undo());
        assert!(!GameMode::Swift.supports_undo());
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!(GameCommand::from_str("a"), Some(GameCommand::Move(Direction::Left)));
        assert_eq!(GameCommand::from_str("next"), Some(GameCommand::NextLevel));
        assert_eq!(GameCommand::from_str("quit"), Some(GameCommand::Home));
        assert_eq!(GameCommand::from_str("level 7"), Some(GameCommand::SelectLevel(7)));
        assert_eq!(GameCommand::from_str(""), None);
        assert_eq!(GameCommand::from_str("select x"), None);
        assert_eq!(GameCommand::from_str("left now"), None);
    }
}
