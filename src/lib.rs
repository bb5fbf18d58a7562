//! Strategic 2048 (workspace facade crate).
//!
//! Exposes `strategic_2048::{core,store,types}` while the implementation lives in
//! dedicated crates under `crates/`, plus the application [`config`] shared by the
//! binary.

pub mod config;

pub use strategic_2048_core as core;
pub use strategic_2048_store as store;
pub use strategic_2048_types as types;
