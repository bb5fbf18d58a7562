//! Durable progress storage
//!
//! [`SqliteProgressStore`] implements the core [`ProgressStore`] trait on a
//! SQLite file. Storage failures never reach the game: the trait surface logs
//! and falls back to defaults, while the `try_*` methods expose [`StoreError`].
//!
//! [`ProgressStore`]: strategic_2048_core::ProgressStore

mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::SqliteProgressStore;
