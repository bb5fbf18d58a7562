//! Observation snapshot of a session, serializable for a presentation layer.

use serde::Serialize;

use crate::grid::Grid;
use crate::rules::Budget;
use crate::session::SessionState;
use crate::targets::TargetProgress;
use crate::types::GameMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub mode: GameMode,
    pub level: Option<u32>,
    pub state: SessionState,
    pub grid: Grid,
    pub score: u32,
    pub high_score: u32,
    pub moves_used: u32,
    pub budget: Budget,
    pub can_undo: bool,
    pub targets: TargetProgress,
}
