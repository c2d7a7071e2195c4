//! Topic note data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Knowledge accumulated for one topic across solved problems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicNote {
    /// Topic label, also the key in the notebook
    pub topic: String,
    /// Explanation fragments, oldest first
    pub concepts: Vec<String>,
    /// Worked example steps, oldest first
    pub examples: Vec<String>,
    /// Steps that look like formulas, oldest first
    pub key_formulas: Vec<String>,
    /// When a solved problem last touched this topic
    pub last_updated: DateTime<Utc>,
    /// Number of solved problems filed under this topic
    pub problem_count: u32,
}

impl TopicNote {
    /// Create an empty note for a topic seen for the first time.
    pub fn new(topic: String, now: DateTime<Utc>) -> Self {
        Self {
            topic,
            concepts: Vec::new(),
            examples: Vec::new(),
            key_formulas: Vec::new(),
            last_updated: now,
            problem_count: 0,
        }
    }

    /// Check whether the topic name or any concept contains `needle`.
    ///
    /// `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        self.topic.to_lowercase().contains(needle)
            || self
                .concepts
                .iter()
                .any(|concept| concept.to_lowercase().contains(needle))
    }
}

/// Summary numbers for the whole notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteStats {
    /// Number of topics with a note
    pub topics_studied: usize,
    /// Sum of problem counts over all topics
    pub problems_solved: u64,
    /// Sum of concept counts over all topics
    pub concepts_learned: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_note_new() {
        let note = TopicNote::new("Algebra".to_string(), Utc::now());
        assert_eq!(note.problem_count, 0);
        assert!(note.concepts.is_empty());
        assert!(note.examples.is_empty());
        assert!(note.key_formulas.is_empty());
    }

    #[test]
    fn test_matches_topic_or_concept() {
        let mut note = TopicNote::new("Geometry".to_string(), Utc::now());
        note.concepts.push("The Pythagorean theorem relates sides".to_string());
        assert!(note.matches("geo"));
        assert!(note.matches("pythagorean"));
        assert!(!note.matches("integral"));
        assert!(note.matches(""));
    }

    #[test]
    fn test_json_field_names() {
        let note = TopicNote::new("Algebra".to_string(), Utc::now());
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("keyFormulas").is_some());
        assert!(json.get("lastUpdated").is_some());
        assert_eq!(json["problemCount"], 0);
    }
}
