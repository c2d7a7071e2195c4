//! # mathbud-types
//!
//! Shared domain types for the MathBud study core.
//!
//! This crate defines the data structures every other crate passes around:
//! - Solutions: the `{explanation, steps}` answer produced by the solve relay
//! - History: capped, newest-first log of solved problems
//! - Chat: the tutoring transcript
//! - Settings: layered configuration
//!
//! ## Usage
//!
//! ```rust
//! use mathbud_types::Solution;
//!
//! let solution = Solution::from_model_output(r#"{"explanation": "Add.", "steps": ["1 + 1 = 2"]}"#);
//! assert_eq!(solution.steps, vec!["1 + 1 = 2".to_string()]);
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod history;
pub mod id;
pub mod solution;

pub use chat::{ChatMessage, ChatTranscript, CHAT_APOLOGY, CHAT_WELCOME};
pub use config::{NotesConfig, Settings};
pub use error::MathBudError;
pub use history::{HistoryItem, HistoryLog, DEFAULT_HISTORY_CAPACITY};
pub use id::IdGenerator;
pub use solution::Solution;
