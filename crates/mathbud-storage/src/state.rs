//! Persisted client state.
//!
//! History, notes and the chat transcript are each stored as one JSON blob
//! under a fixed [`StateKey`]. Blobs are rewritten whole after every state
//! change. On load, a blob that is missing yields empty state; a blob that
//! no longer parses is logged and discarded so a corrupt store can never
//! keep the application from starting.

use std::sync::Arc;

use mathbud_topics::{NoteBook, TopicNote};
use mathbud_types::{ChatMessage, HistoryItem, HistoryLog, NotesConfig};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::column_families::CF_STATE;
use crate::db::Storage;
use crate::error::StorageError;
use crate::keys::StateKey;

/// Load/save access to the persisted state blobs.
pub struct StateStore {
    storage: Arc<Storage>,
}

impl StateStore {
    /// Create a new state store wrapper.
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Get underlying storage.
    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    // --- History ---

    /// Load the history log, keeping at most `capacity` items.
    #[instrument(skip(self))]
    pub fn load_history(&self, capacity: usize) -> Result<HistoryLog, StorageError> {
        let items: Vec<HistoryItem> = self.load_blob(StateKey::History)?.unwrap_or_default();
        debug!(items = items.len(), "Loaded history");
        Ok(HistoryLog::from_items(items, capacity))
    }

    /// Save the history log.
    #[instrument(skip_all, fields(items = history.len()))]
    pub fn save_history(&self, history: &HistoryLog) -> Result<(), StorageError> {
        self.save_blob(StateKey::History, history.items())
    }

    // --- Notes ---

    /// Load the notebook.
    #[instrument(skip(self, config))]
    pub fn load_notes(&self, config: NotesConfig) -> Result<NoteBook, StorageError> {
        let entries: Vec<(String, TopicNote)> =
            self.load_blob(StateKey::Notes)?.unwrap_or_default();
        debug!(topics = entries.len(), "Loaded notes");
        Ok(NoteBook::from_entries(entries, config))
    }

    /// Save the notebook as `[topic, note]` pairs.
    #[instrument(skip_all, fields(topics = notes.len()))]
    pub fn save_notes(&self, notes: &NoteBook) -> Result<(), StorageError> {
        self.save_blob(StateKey::Notes, &notes.entries())
    }

    // --- Chat ---

    /// Load the chat transcript.
    ///
    /// Returns `None` when no usable transcript is stored, so the caller
    /// can seed a fresh one.
    #[instrument(skip(self))]
    pub fn load_chat(&self) -> Result<Option<Vec<ChatMessage>>, StorageError> {
        self.load_blob(StateKey::Chat)
    }

    /// Save the chat transcript.
    #[instrument(skip_all, fields(messages = messages.len()))]
    pub fn save_chat(&self, messages: &[ChatMessage]) -> Result<(), StorageError> {
        self.save_blob(StateKey::Chat, messages)
    }

    /// Forget the stored chat transcript.
    pub fn clear_chat(&self) -> Result<(), StorageError> {
        self.storage.delete(CF_STATE, StateKey::Chat.to_bytes())
    }

    // --- Blobs ---

    fn load_blob<T: DeserializeOwned>(&self, key: StateKey) -> Result<Option<T>, StorageError> {
        let Some(bytes) = self.storage.get(CF_STATE, key.to_bytes())? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding malformed persisted state");
                Ok(None)
            }
        }
    }

    fn save_blob<T: serde::Serialize + ?Sized>(
        &self,
        key: StateKey,
        value: &T,
    ) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        self.storage.put(CF_STATE, key.to_bytes(), &bytes)?;
        debug!(key = %key, bytes = bytes.len(), "Saved state");
        Ok(())
    }
}
