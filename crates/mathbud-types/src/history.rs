//! Solved-problem history.
//!
//! The history is a newest-first list capped at a fixed capacity. Items are
//! created once per solve and never mutated; the only way an item leaves
//! the log is by being pushed past the capacity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::solution::Solution;

/// Number of solved problems kept by default.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// One solved problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Unique, time-derived identifier
    pub id: String,
    /// When the problem was solved
    pub timestamp: DateTime<Utc>,
    /// The answer as returned by the solve relay
    pub solution: Solution,
    /// Primary topic assigned at solve time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
}

impl HistoryItem {
    /// Record a solved problem tagged with its primary topic.
    pub fn record(
        id: String,
        solution: Solution,
        primary_topic: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            timestamp: now,
            solution,
            problem_type: primary_topic,
        }
    }
}

/// Newest-first, capacity-bounded list of [`HistoryItem`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    items: Vec<HistoryItem>,
    capacity: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryLog {
    /// Create an empty log that keeps at most `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Rebuild a log from persisted items (already newest first).
    ///
    /// Items beyond the capacity are dropped from the old end.
    pub fn from_items(mut items: Vec<HistoryItem>, capacity: usize) -> Self {
        items.truncate(capacity);
        Self { items, capacity }
    }

    /// Return a new log with `item` prepended.
    pub fn append(&self, item: HistoryItem) -> Self {
        let mut next = self.clone();
        next.push(item);
        next
    }

    /// Prepend `item`, dropping the oldest entries beyond capacity.
    pub fn push(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(self.capacity);
    }

    /// All items, newest first.
    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    /// Maximum number of items retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items in the log.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items matching a free-text search and an optional problem type.
    ///
    /// The search is a case-insensitive substring match over the explanation
    /// and every step; an empty search matches everything. The type, when
    /// given, must equal the item's problem type exactly.
    pub fn filter(&self, search: &str, problem_type: Option<&str>) -> Vec<&HistoryItem> {
        let needle = search.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.solution.mentions(&needle))
            .filter(|item| match problem_type {
                Some(wanted) => item.problem_type.as_deref() == Some(wanted),
                None => true,
            })
            .collect()
    }

    /// Distinct problem types in first-seen (newest first) order.
    pub fn problem_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for problem_type in self.items.iter().filter_map(|i| i.problem_type.as_deref()) {
            if !problem_type.is_empty() && !types.contains(&problem_type) {
                types.push(problem_type);
            }
        }
        types
    }
}
