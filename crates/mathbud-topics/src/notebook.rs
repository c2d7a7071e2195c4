//! Per-topic note accumulation.
//!
//! The notebook maps a topic label to the [`TopicNote`] built up from every
//! solved problem filed under it. Notes are created on first sight of a
//! topic, merged into on every later solve and renamed by moving them to a
//! new key; nothing else ever removes one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use mathbud_types::{NotesConfig, Solution};
use tracing::{debug, info, warn};

use crate::error::TopicsError;
use crate::extraction::{extract_concepts, extract_examples, extract_formulas, merge_capped};
use crate::types::{NoteStats, TopicNote};

/// Topic label → accumulated note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteBook {
    notes: BTreeMap<String, TopicNote>,
    config: NotesConfig,
}

impl NoteBook {
    /// Create an empty notebook with the given limits.
    pub fn new(config: NotesConfig) -> Self {
        Self {
            notes: BTreeMap::new(),
            config,
        }
    }

    /// Rebuild a notebook from persisted `[topic, note]` pairs.
    ///
    /// Entries with a blank key are skipped. A note's `topic` field is
    /// realigned with its key.
    pub fn from_entries(entries: Vec<(String, TopicNote)>, config: NotesConfig) -> Self {
        let mut notes = BTreeMap::new();
        for (topic, mut note) in entries {
            if topic.trim().is_empty() {
                warn!("Skipping persisted note with blank topic");
                continue;
            }
            note.topic.clone_from(&topic);
            notes.insert(topic, note);
        }
        Self { notes, config }
    }

    /// Snapshot as `[topic, note]` pairs, for persistence.
    pub fn entries(&self) -> Vec<(String, TopicNote)> {
        self.notes
            .iter()
            .map(|(topic, note)| (topic.clone(), note.clone()))
            .collect()
    }

    /// The limits this notebook enforces.
    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    /// Look up a note by exact topic label.
    pub fn get(&self, topic: &str) -> Option<&TopicNote> {
        self.notes.get(topic)
    }

    /// All notes, ordered by topic label.
    pub fn notes(&self) -> impl Iterator<Item = &TopicNote> {
        self.notes.values()
    }

    /// Number of topics with a note.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Check if no topic has a note yet.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Return a new notebook with `solution` merged into each of `topics`.
    pub fn with_solution(&self, solution: &Solution, topics: &[String], now: DateTime<Utc>) -> Self {
        let mut next = self.clone();
        next.record(solution, topics, now);
        next
    }

    /// Merge `solution` into the note of every topic in `topics`.
    ///
    /// Each topic is updated independently: its problem count goes up by one,
    /// its timestamp moves to `now`, and fresh concepts, examples and
    /// formulas are appended up to the configured caps.
    pub fn record(&mut self, solution: &Solution, topics: &[String], now: DateTime<Utc>) {
        let concepts = extract_concepts(solution, self.config.min_concept_chars);
        let examples = extract_examples(solution, self.config.min_example_chars);
        let formulas = extract_formulas(solution);

        for topic in topics {
            let existing = self
                .notes
                .remove(topic)
                .unwrap_or_else(|| TopicNote::new(topic.clone(), now));

            let updated = TopicNote {
                topic: topic.clone(),
                concepts: merge_capped(&existing.concepts, &concepts, self.config.concept_cap),
                examples: merge_capped(&existing.examples, &examples, self.config.example_cap),
                key_formulas: merge_capped(
                    &existing.key_formulas,
                    &formulas,
                    self.config.formula_cap,
                ),
                last_updated: now,
                problem_count: existing.problem_count.saturating_add(1),
            };

            debug!(
                topic = %topic,
                problem_count = updated.problem_count,
                concepts = updated.concepts.len(),
                examples = updated.examples.len(),
                formulas = updated.key_formulas.len(),
                "Updated topic note"
            );
            self.notes.insert(topic.clone(), updated);
        }
    }

    /// Return a new notebook with `old_name` renamed to `new_name`.
    pub fn renamed(&self, old_name: &str, new_name: &str) -> Result<Self, TopicsError> {
        let mut next = self.clone();
        next.rename(old_name, new_name)?;
        Ok(next)
    }

    /// Move the note for `old_name` under `new_name`.
    ///
    /// Does nothing if `old_name` has no note. Fails without touching
    /// anything if `new_name` is blank or matches, ignoring case, any topic
    /// other than `old_name`. On success only the note's `topic` field
    /// changes and no entry remains under the old key.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), TopicsError> {
        if !self.notes.contains_key(old_name) {
            debug!(old_name, "Rename of unknown topic ignored");
            return Ok(());
        }

        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(TopicsError::InvalidInput(
                "Topic name cannot be empty".to_string(),
            ));
        }

        let folded = new_name.to_lowercase();
        if let Some(existing) = self
            .notes
            .keys()
            .find(|key| key.as_str() != old_name && key.to_lowercase() == folded)
        {
            return Err(TopicsError::NameConflict {
                requested: new_name.to_string(),
                existing: existing.clone(),
            });
        }

        if let Some(mut note) = self.notes.remove(old_name) {
            note.topic = new_name.to_string();
            self.notes.insert(new_name.to_string(), note);
            info!(old_name, new_name, "Renamed topic");
        }
        Ok(())
    }

    /// Notes whose topic or any concept contains `term`, ignoring case.
    ///
    /// An empty term matches every note.
    pub fn search(&self, term: &str) -> Vec<&TopicNote> {
        let needle = term.to_lowercase();
        self.notes.values().filter(|note| note.matches(&needle)).collect()
    }

    /// Totals across every note.
    pub fn stats(&self) -> NoteStats {
        NoteStats {
            topics_studied: self.notes.len(),
            problems_solved: self
                .notes
                .values()
                .map(|note| u64::from(note.problem_count))
                .sum(),
            concepts_learned: self.notes.values().map(|note| note.concepts.len()).sum(),
        }
    }
}
