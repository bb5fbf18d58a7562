//! SQLite progress store
//!
//! Two tables keyed by the mode's storage key:
//!
//! ```sql
//! high_scores(mode TEXT PRIMARY KEY, score INTEGER)
//! unlocked_levels(mode TEXT PRIMARY KEY, level INTEGER)
//! ```
//!
//! Missing rows read as the defaults. Each write is a single upsert.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use strategic_2048_core::progress::{DEFAULT_HIGH_SCORE, DEFAULT_UNLOCKED_LEVEL};
use strategic_2048_core::ProgressStore;
use strategic_2048_types::GameMode;

use crate::error::StoreError;

const SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS high_scores (
        mode TEXT PRIMARY KEY,
        score INTEGER
    );

    CREATE TABLE IF NOT EXISTS unlocked_levels (
        mode TEXT PRIMARY KEY,
        level INTEGER
    );
";

#[derive(Debug)]
pub struct SqliteProgressStore {
    /// None when the database could not be opened
    conn: Option<Connection>,
    path: Option<PathBuf>,
}

impl SqliteProgressStore {
    /// Open or create the database at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::initialize(conn, Some(path.to_path_buf()))
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn, None)
    }

    /// Open `path`, or fall back to a store that reads defaults and drops writes
    pub fn open_or_unavailable(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(store) => store,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "progress store unavailable");
                Self::unavailable(Some(path.to_path_buf()))
            }
        }
    }

    pub fn unavailable(path: Option<PathBuf>) -> Self {
        Self { conn: None, path }
    }

    fn initialize(conn: Connection, path: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        debug!(path = ?path, "progress store ready");
        Ok(Self {
            conn: Some(conn),
            path,
        })
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<&Connection, StoreError> {
        self.conn.as_ref().ok_or(StoreError::Unavailable)
    }

    pub fn try_unlocked_level(&self, mode: GameMode) -> Result<u32, StoreError> {
        let level: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT level FROM unlocked_levels WHERE mode = ?1",
                params![mode.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(level
            .and_then(|l| u32::try_from(l).ok())
            .filter(|&l| l >= DEFAULT_UNLOCKED_LEVEL)
            .unwrap_or(DEFAULT_UNLOCKED_LEVEL))
    }

    /// Store `level + 1` as the unlocked level
    pub fn try_unlock_level(&self, mode: GameMode, level: u32) -> Result<(), StoreError> {
        let unlocked = i64::from(level) + 1;
        self.conn()?.execute(
            "INSERT INTO unlocked_levels (mode, level) VALUES (?1, ?2)
             ON CONFLICT(mode) DO UPDATE SET level = excluded.level",
            params![mode.as_str(), unlocked],
        )?;
        Ok(())
    }

    pub fn try_high_score(&self, mode: GameMode) -> Result<u32, StoreError> {
        let score: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT score FROM high_scores WHERE mode = ?1",
                params![mode.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(score
            .and_then(|s| u32::try_from(s).ok())
            .unwrap_or(DEFAULT_HIGH_SCORE))
    }

    pub fn try_set_high_score(&self, mode: GameMode, score: u32) -> Result<(), StoreError> {
        self.conn()?.execute(
            "INSERT INTO high_scores (mode, score) VALUES (?1, ?2)
             ON CONFLICT(mode) DO UPDATE SET score = excluded.score",
            params![mode.as_str(), i64::from(score)],
        )?;
        Ok(())
    }
}

impl ProgressStore for SqliteProgressStore {
    fn unlocked_level(&self, mode: GameMode) -> u32 {
        self.try_unlocked_level(mode).unwrap_or_else(|err| {
            warn!(mode = mode.as_str(), error = %err, "failed to read unlocked level");
            DEFAULT_UNLOCKED_LEVEL
        })
    }

    fn unlock_level(&mut self, mode: GameMode, level: u32) {
        if let Err(err) = self.try_unlock_level(mode, level) {
            warn!(mode = mode.as_str(), level, error = %err, "failed to save unlocked level");
        }
    }

    fn high_score(&self, mode: GameMode) -> u32 {
        self.try_high_score(mode).unwrap_or_else(|err| {
            warn!(mode = mode.as_str(), error = %err, "failed to read high score");
            DEFAULT_HIGH_SCORE
        })
    }

    fn set_high_score(&mut self, mode: GameMode, score: u32) {
        if let Err(err) = self.try_set_high_score(mode, score) {
            warn!(mode = mode.as_str(), score, error = %err, "failed to save high score");
        }
    }
}
