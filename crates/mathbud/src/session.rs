//! The study session: sole owner of notes, history and chat state.
//!
//! A session loads persisted state once when it opens and saves the
//! affected blob after every state transition. A failed save is logged and
//! otherwise ignored; the in-memory state stays authoritative for the rest
//! of the session.

use chrono::{DateTime, Utc};
use mathbud_storage::{StateStore, StorageError};
use mathbud_topics::{KeywordDetector, NoteBook, TopicsError};
use mathbud_types::{
    ChatMessage, ChatTranscript, HistoryItem, HistoryLog, IdGenerator, Settings, Solution,
    CHAT_APOLOGY,
};
use tracing::{debug, info, instrument, warn};

use crate::relay::{ChatRelay, ProblemImage, RelayError, SolveRelay};

/// What one solved problem produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Topics detected, primary first
    pub topics: Vec<String>,
    /// The history entry that was recorded
    pub item: HistoryItem,
}

/// Application context for one user.
pub struct StudySession {
    store: StateStore,
    notes: NoteBook,
    history: HistoryLog,
    chat: ChatTranscript,
    detector: KeywordDetector,
    ids: IdGenerator,
}

impl StudySession {
    /// Load persisted state and start a session.
    #[instrument(skip_all)]
    pub fn open(store: StateStore, settings: &Settings) -> Result<Self, StorageError> {
        let notes = store.load_notes(settings.notes.clone())?;
        let history = store.load_history(settings.history_capacity)?;
        let persisted_chat = store.load_chat()?;

        let ids = IdGenerator::new();
        for item in history.items() {
            ids.observe(&item.id);
        }
        for message in persisted_chat.iter().flatten() {
            ids.observe(&message.id);
        }

        let now = Utc::now();
        let chat = ChatTranscript::load_or_welcome(persisted_chat, ids.next_id(now), now);

        info!(
            topics = notes.len(),
            history = history.len(),
            chat = chat.len(),
            "Study session opened"
        );

        Ok(Self {
            store,
            notes,
            history,
            chat,
            detector: KeywordDetector::default(),
            ids,
        })
    }

    /// Persisted state backing this session.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Accumulated topic notes.
    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    /// Solved-problem history, newest first.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Chat transcript, oldest first.
    pub fn chat(&self) -> &ChatTranscript {
        &self.chat
    }

    /// Ask the solve relay for a solution and file it.
    ///
    /// If the relay fails, nothing is recorded.
    pub fn solve(
        &mut self,
        relay: &dyn SolveRelay,
        image: &ProblemImage,
    ) -> Result<SolveOutcome, RelayError> {
        let solution = relay
            .solve(image)
            .inspect_err(|e| warn!(error = %e, "Solve relay failed; nothing recorded"))?;
        Ok(self.record_solution(solution))
    }

    /// File a solution produced just now.
    pub fn record_solution(&mut self, solution: Solution) -> SolveOutcome {
        self.record_solution_at(solution, Utc::now())
    }

    /// Detect topics, update their notes and append a history entry.
    #[instrument(skip(self, solution))]
    pub fn record_solution_at(&mut self, solution: Solution, now: DateTime<Utc>) -> SolveOutcome {
        let topics = self.detector.detect(&solution);

        self.notes.record(&solution, &topics, now);
        self.persist_notes();

        let item = HistoryItem::record(
            self.ids.next_id(now),
            solution,
            topics.first().cloned(),
            now,
        );
        self.history.push(item.clone());
        self.persist_history();

        info!(id = %item.id, ?topics, "Recorded solved problem");
        SolveOutcome { topics, item }
    }

    /// Rename a topic.
    ///
    /// Renaming an unknown topic is a no-op; a conflicting name is rejected
    /// and leaves the notes untouched.
    pub fn rename_topic(&mut self, old_name: &str, new_name: &str) -> Result<(), TopicsError> {
        if self.notes.get(old_name).is_none() {
            debug!(old_name, "No note to rename");
            return Ok(());
        }
        self.notes.rename(old_name, new_name)?;
        self.persist_notes();
        Ok(())
    }

    /// Send a tutoring question and record the exchange.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the student's
    /// message is recorded, followed by the tutor's reply, or an apology if
    /// the relay failed; the tutor's message is returned.
    pub fn send_chat(&mut self, relay: &dyn ChatRelay, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let now = Utc::now();
        self.chat
            .push(ChatMessage::from_user(self.ids.next_id(now), text, now));

        let reply = relay.reply(text).unwrap_or_else(|e| {
            warn!(error = %e, "Chat relay failed");
            CHAT_APOLOGY.to_string()
        });
        let now = Utc::now();
        self.chat
            .push(ChatMessage::from_tutor(self.ids.next_id(now), reply, now));
        self.persist_chat();

        self.chat.messages().last()
    }

    /// Forget the transcript and start over with the welcome message.
    pub fn clear_chat(&mut self) {
        if let Err(e) = self.store.clear_chat() {
            warn!(error = %e, "Failed to clear persisted chat");
        }
        let now = Utc::now();
        self.chat = ChatTranscript::load_or_welcome(None, self.ids.next_id(now), now);
    }

    fn persist_notes(&self) {
        if let Err(e) = self.store.save_notes(&self.notes) {
            warn!(error = %e, "Failed to persist notes");
        }
    }

    fn persist_history(&self) {
        if let Err(e) = self.store.save_history(&self.history) {
            warn!(error = %e, "Failed to persist history");
        }
    }

    fn persist_chat(&self) {
        if let Err(e) = self.store.save_chat(self.chat.messages()) {
            warn!(error = %e, "Failed to persist chat");
        }
    }
}
