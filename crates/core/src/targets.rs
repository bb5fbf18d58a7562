//! Adventure target tracking, owned by a single session
//!
//! Each target carries two counters:
//! - `on_board`: tiles of that value present right now (this decides the win)
//! - `created`: merges that produced that value during this attempt (informational)

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::grid::Grid;
use crate::levels::AdventureLevel;
use crate::types::Cell;

/// Most targets any level defines
pub const MAX_TARGETS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetStatus {
    pub tile: Cell,
    pub required: u32,
    pub on_board: u32,
    pub created: u32,
}

impl TargetStatus {
    pub fn is_met(&self) -> bool {
        self.on_board >= self.required
    }
}

/// Per-attempt progress toward an Adventure level's targets.
///
/// Empty for Classic and Swift sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetProgress {
    targets: ArrayVec<TargetStatus, MAX_TARGETS>,
}

impl TargetProgress {
    pub fn for_level(level: &AdventureLevel) -> Self {
        let targets = level
            .targets
            .iter()
            .take(MAX_TARGETS)
            .map(|t| TargetStatus {
                tile: t.tile,
                required: t.count,
                on_board: 0,
                created: 0,
            })
            .collect();
        Self { targets }
    }

    /// Count merge results that match a target tile
    pub fn record_merges(&mut self, merges: &[Cell]) {
        for &value in merges {
            for target in self.targets.iter_mut().filter(|t| t.tile == value) {
                target.created += 1;
            }
        }
    }

    /// Recount target tiles present on the grid
    pub fn refresh(&mut self, grid: &Grid) {
        for target in &mut self.targets {
            target.on_board = grid.count_tile(target.tile) as u32;
        }
    }

    /// Every target is present on the board (false when there are no targets)
    pub fn all_met(&self) -> bool {
        !self.targets.is_empty() && self.targets.iter().all(TargetStatus::is_met)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetStatus> {
        self.targets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
