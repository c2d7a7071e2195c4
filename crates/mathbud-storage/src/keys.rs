//! Keys for persisted state blobs.
//!
//! Each piece of client state lives under one fixed key. The key names
//! match the ones the browser client uses in local storage, so a blob
//! exported from one can be imported into the other unchanged.

use std::fmt;

/// Which piece of state a blob holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Newest-first list of solved problems
    History,
    /// `[topic, note]` pairs
    Notes,
    /// Chat transcript, oldest first
    Chat,
}

impl StateKey {
    /// Storage key name.
    pub fn name(&self) -> &'static str {
        match self {
            StateKey::History => "mathBudHistory",
            StateKey::Notes => "mathBudNotes",
            StateKey::Chat => "mathBudChat",
        }
    }

    /// Encode key to bytes for storage
    pub fn to_bytes(&self) -> &'static [u8] {
        self.name().as_bytes()
    }

    /// Get all state keys.
    pub fn all() -> &'static [StateKey] {
        &[StateKey::History, StateKey::Notes, StateKey::Chat]
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(StateKey::History.name(), "mathBudHistory");
        assert_eq!(StateKey::Notes.name(), "mathBudNotes");
        assert_eq!(StateKey::Chat.name(), "mathBudChat");
    }

    #[test]
    fn test_all_keys_distinct() {
        let all = StateKey::all();
        assert_eq!(all.len(), 3);
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.to_bytes(), b.to_bytes());
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", StateKey::Notes), "mathBudNotes");
    }
}
