//! Time-derived identifiers for history items and chat messages.
//!
//! Ids are the decimal millisecond timestamp of creation. Two ids requested
//! within the same millisecond would collide, so the generator remembers the
//! last value it handed out and bumps forward past it.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

/// Monotonic generator of millisecond-derived ids.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_ms: AtomicI64,
}

impl IdGenerator {
    /// Create a generator with no history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id for something created at `now`.
    ///
    /// Returns `now` in epoch milliseconds, or `last + 1` when `now` is not
    /// strictly after the previous id.
    pub fn next_id(&self, now: DateTime<Utc>) -> String {
        let wanted = now.timestamp_millis();
        let previous = self
            .last_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(wanted.max(last.saturating_add(1)))
            })
            .unwrap_or(wanted);
        wanted.max(previous.saturating_add(1)).to_string()
    }

    /// Raise the floor so later ids sort after `id`.
    ///
    /// Ids that are not plain millisecond numbers are ignored.
    pub fn observe(&self, id: &str) {
        if let Ok(ms) = id.parse::<i64>() {
            self.last_ms.fetch_max(ms, Ordering::SeqCst);
        }
    }
}
