//! Level catalog - static Adventure and Swift level tables
//!
//! Levels are indexed 1-based. Classic has no table; it behaves as a single,
//! always-final level.

use serde::Serialize;

use crate::grid::Grid;
use crate::types::{Cell, GameMode};

/// A tile an Adventure level asks the player to hold on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TileTarget {
    pub tile: Cell,
    pub count: u32,
}

impl TileTarget {
    pub const fn new(tile: Cell, count: u32) -> Self {
        Self { tile, count }
    }

    /// Whether the grid currently holds at least `count` tiles of value `tile`
    pub fn is_met(&self, grid: &Grid) -> bool {
        grid.count_tile(self.tile) >= self.count as usize
    }
}

/// Adventure level: tile targets under a move budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdventureLevel {
    pub targets: &'static [TileTarget],
    pub max_moves: u32,
}

impl AdventureLevel {
    /// All targets are present on the board at the same time
    pub fn targets_met(&self, grid: &Grid) -> bool {
        self.targets.iter().all(|t| t.is_met(grid))
    }
}

/// Swift level: score target under a time budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwiftLevel {
    pub target_score: u32,
    /// Seconds
    pub time_limit: u32,
}

impl SwiftLevel {
    pub fn time_limit_ms(&self) -> u64 {
        u64::from(self.time_limit) * 1000
    }
}

/// Adventure levels, in order
pub const ADVENTURE_LEVELS: [AdventureLevel; 15] = [
    AdventureLevel {
        targets: &[TileTarget { tile: 16, count: 4 }, TileTarget { tile: 32, count: 1 }],
        max_moves: 40,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 64, count: 3 }, TileTarget { tile: 128, count: 1 }],
        max_moves: 50,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 128, count: 1 }],
        max_moves: 40,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 256, count: 1 }],
        max_moves: 50,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 512, count: 1 }],
        max_moves: 60,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 1024, count: 1 }],
        max_moves: 70,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 2048, count: 1 }],
        max_moves: 80,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 4096, count: 1 }],
        max_moves: 90,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 8192, count: 1 }],
        max_moves: 100,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 16384, count: 1 }],
        max_moves: 110,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 32768, count: 1 }],
        max_moves: 120,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 65536, count: 1 }],
        max_moves: 130,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 131072, count: 1 }],
        max_moves: 140,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 262144, count: 1 }],
        max_moves: 150,
    },
    AdventureLevel {
        targets: &[TileTarget { tile: 524288, count: 1 }],
        max_moves: 160,
    },
];

/// Swift levels, in order
pub const SWIFT_LEVELS: [SwiftLevel; 7] = [
    SwiftLevel { target_score: 64, time_limit: 120 },
    SwiftLevel { target_score: 128, time_limit: 150 },
    SwiftLevel { target_score: 512, time_limit: 180 },
    SwiftLevel { target_score: 1024, time_limit: 210 },
    SwiftLevel { target_score: 2048, time_limit: 240 },
    SwiftLevel { target_score: 4096, time_limit: 270 },
    SwiftLevel { target_score: 8192, time_limit: 300 },
];

/// A level resolved from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDef {
    Classic,
    Adventure(&'static AdventureLevel),
    Swift(&'static SwiftLevel),
}

/// Read-only access to the level tables
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    /// Adventure level `n` (1-based), or None when out of range
    pub fn adventure_level(n: u32) -> Option<&'static AdventureLevel> {
        ADVENTURE_LEVELS.get(index(n)?)
    }

    /// Swift level `n` (1-based), or None when out of range
    pub fn swift_level(n: u32) -> Option<&'static SwiftLevel> {
        SWIFT_LEVELS.get(index(n)?)
    }

    /// Level `n` of any mode. Classic only has level 1.
    pub fn level(mode: GameMode, n: u32) -> Option<LevelDef> {
        match mode {
            GameMode::Classic => (n == 1).then_some(LevelDef::Classic),
            GameMode::Adventure => Self::adventure_level(n).map(LevelDef::Adventure),
            GameMode::Swift => Self::swift_level(n).map(LevelDef::Swift),
        }
    }

    pub fn count(mode: GameMode) -> u32 {
        match mode {
            GameMode::Classic => 1,
            GameMode::Adventure => ADVENTURE_LEVELS.len() as u32,
            GameMode::Swift => SWIFT_LEVELS.len() as u32,
        }
    }

    pub fn is_final_level(mode: GameMode, n: u32) -> bool {
        n >= Self::count(mode)
    }

    /// Levels a player may pick given the stored unlocked level
    pub fn selectable_levels(mode: GameMode, unlocked: u32) -> std::ops::RangeInclusive<u32> {
        1..=Self::count(mode).min(unlocked.max(1))
    }
}

fn index(n: u32) -> Option<usize> {
    (n as usize).checked_sub(1)
}
