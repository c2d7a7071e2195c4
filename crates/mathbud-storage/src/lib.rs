//! Storage layer for MathBud.
//!
//! Provides RocksDB-backed storage with:
//! - A `state` column family holding one serialized blob per piece of
//!   client state (history, notes, chat transcript)
//! - Lenient loading: a blob that no longer parses is discarded and the
//!   caller starts from empty state

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;
pub mod state;

pub use db::{Storage, StorageStats};
pub use error::StorageError;
pub use keys::StateKey;
pub use state::StateStore;
