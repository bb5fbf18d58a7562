//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the rules of a 3x3 tile-merging puzzle with three modes.
//! It has no dependency on rendering, input devices, or storage backends;
//! persistence goes through the [`ProgressStore`] trait and time through the
//! [`Clock`] trait.
//!
//! # Module Structure
//!
//! - [`grid`]: 3x3 grid, slide/merge transitions, spawn and terminal detection
//! - [`levels`]: Adventure and Swift level tables
//! - [`rules`]: per-mode win/lose predicates and budgets
//! - [`targets`]: Adventure target progress
//! - [`history`]: bounded undo history
//! - [`progress`]: unlocked-level and high-score persistence seam
//! - [`session`]: the mode session state machine
//! - [`clock`]: wall and manual clocks, pausable stopwatch
//! - [`rng`]: seeded random tile spawning
//!
//! # Game Rules
//!
//! - **Classic**: endless play, loses when no move changes the grid, undo allowed
//! - **Adventure**: hold target tiles on the board within a move budget, undo allowed
//! - **Swift**: reach a score within a time limit, no undo
//!
//! # Example
//!
//! ```
//! use strategic_2048_core::{MemoryProgressStore, Session, SessionConfig, SessionState};
//! use strategic_2048_types::{Direction, GameCommand, GameMode};
//!
//! let config = SessionConfig { seed: Some(12345), ..SessionConfig::default() };
//! let mut session = Session::new(GameMode::Classic, MemoryProgressStore::new(), config);
//!
//! session.apply(GameCommand::SelectLevel(1));
//! assert_eq!(session.state(), SessionState::Playing);
//! assert_eq!(session.grid().tile_count(), 2);
//!
//! for direction in Direction::ALL {
//!     session.apply(GameCommand::Move(direction));
//! }
//! assert!(session.moves_used() >= 1);
//! ```

pub mod clock;
pub mod grid;
pub mod history;
pub mod levels;
pub mod progress;
pub mod rng;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod targets;

pub use strategic_2048_types as types;

// Re-export commonly used types for convenience
pub use clock::{Clock, ManualClock, Stopwatch, SystemClock};
pub use grid::{apply_move, can_move, is_terminal, spawn_tile, Grid, MoveResult};
pub use levels::{AdventureLevel, Catalog, LevelDef, SwiftLevel, TileTarget};
pub use progress::{MemoryProgressStore, ProgressStore};
pub use rng::SimpleRng;
pub use rules::{Budget, LoseReason, ModeRules, Outcome};
pub use session::{Session, SessionConfig, SessionEvent, SessionState};
pub use snapshot::SessionSnapshot;
pub use targets::{TargetProgress, TargetStatus};
