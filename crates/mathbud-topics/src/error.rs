//! Topic error types.

use thiserror::Error;

/// Errors that can occur during topic operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopicsError {
    /// Rename target collides (case-insensitively) with another topic
    #[error("Topic name conflict: {requested:?} collides with existing topic {existing:?}")]
    NameConflict {
        /// Name the caller asked for
        requested: String,
        /// Topic already holding that name
        existing: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
