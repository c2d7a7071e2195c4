//! Error types for the MathBud study core.

use thiserror::Error;

/// Unified error type for shared MathBud operations.
#[derive(Debug, Error)]
pub enum MathBudError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
