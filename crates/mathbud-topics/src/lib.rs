//! # mathbud-topics
//!
//! Topic tagging and per-topic note accumulation for MathBud.
//!
//! Every solved problem is tagged with one or more coarse topics by keyword
//! matching, and each topic keeps a small notebook of concepts, worked
//! examples and formulas harvested from the solutions filed under it.
//!
//! ## Features
//! - Fixed-priority keyword detection with a "General Math" fallback
//! - Capped, deduplicated note merging
//! - Case-insensitive conflict checking on topic rename
//! - Search and summary statistics over the notebook

pub mod detector;
pub mod error;
pub mod extraction;
pub mod notebook;
pub mod types;

pub use detector::{detect_topics, KeywordDetector, KeywordRule, GENERAL_MATH};
pub use error::TopicsError;
pub use extraction::{extract_concepts, extract_examples, extract_formulas, merge_capped};
pub use notebook::NoteBook;
pub use types::{NoteStats, TopicNote};
