//! Command implementations for the MathBud CLI.
//!
//! Handles:
//! - settings: load config and apply CLI overrides
//! - session: open storage and load state
//! - one handler per subcommand, writing human-readable output

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use mathbud_storage::{StateStore, Storage};
use mathbud_topics::TopicNote;
use mathbud_types::{HistoryItem, Settings};
use tracing::info;

use crate::cli::ChatCommands;
use crate::relay::{ProblemImage, ReplayRelay};
use crate::session::StudySession;

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    log_level_override: Option<&str>,
    db_path_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    if let Some(db_path) = db_path_override {
        settings.db_path = db_path.to_string();
    }
    Ok(settings)
}

/// Initialize logging to stderr. `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Open storage and load the persisted state into a session.
pub fn open_session(settings: &Settings) -> Result<StudySession> {
    let db_path = settings.expanded_db_path();
    info!("Opening storage at {:?}", db_path);

    fs::create_dir_all(&db_path).context("Failed to create database directory")?;

    let storage = Storage::open(&db_path).context("Failed to open storage")?;
    let store = StateStore::new(Arc::new(storage));
    StudySession::open(store, settings).context("Failed to load saved state")
}

/// Flush persisted state to disk before exit.
pub fn close_session(session: StudySession) -> Result<()> {
    session
        .store()
        .storage()
        .flush()
        .context("Failed to flush storage")?;
    info!("Storage flushed");
    Ok(())
}

/// File a recorded model response as a solved problem.
pub fn handle_solve(
    session: &mut StudySession,
    image: &Path,
    response: &Path,
    out: &mut dyn Write,
) -> Result<()> {
    let image = ProblemImage::from_path(image)
        .with_context(|| format!("Cannot use {} as a problem image", image.display()))?;
    let relay = ReplayRelay::from_file(response)
        .with_context(|| format!("Cannot read model response {}", response.display()))?;

    let outcome = session
        .solve(&relay, &image)
        .context("Failed to solve the math problem")?;

    writeln!(out, "Solved problem {}", outcome.item.id)?;
    writeln!(out, "Topics: {}", outcome.topics.join(", "))?;
    writeln!(out)?;
    write_solution(out, &outcome.item)?;
    Ok(())
}

/// List solved problems matching a search and type filter.
pub fn handle_history(
    session: &StudySession,
    search: &str,
    topic: Option<&str>,
    limit: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let history = session.history();
    if history.is_empty() {
        writeln!(out, "No problems solved yet.")?;
        return Ok(());
    }

    let problem_type = topic.filter(|t| *t != "all");
    let matches = history.filter(search, problem_type);
    if matches.is_empty() {
        writeln!(out, "No problems found matching your search criteria.")?;
        return Ok(());
    }

    for item in matches.iter().take(limit) {
        writeln!(
            out,
            "{}  {}  [{}]  {}",
            item.id,
            item.timestamp.format("%b %-d, %Y %H:%M"),
            item.problem_type.as_deref().unwrap_or("Unknown"),
            preview(&item.solution.explanation, 60)
        )?;
    }
    writeln!(
        out,
        "\n{} of {} problems. Types: {}",
        matches.len().min(limit),
        history.len(),
        history.problem_types().join(", ")
    )?;
    Ok(())
}

/// Print one solved problem in full.
pub fn handle_show(session: &StudySession, id: &str, out: &mut dyn Write) -> Result<()> {
    let item = session
        .history()
        .get(id)
        .with_context(|| format!("No solved problem with id {id}"))?;
    write_solution(out, item)?;
    Ok(())
}

/// List topic notes matching a search.
pub fn handle_notes(session: &StudySession, search: &str, out: &mut dyn Write) -> Result<()> {
    let notes = session.notes();
    if notes.is_empty() {
        writeln!(out, "No notes yet. Start solving math problems to build your notes!")?;
        return Ok(());
    }

    for note in notes.search(search) {
        writeln!(
            out,
            "{}  ({} problem{}, updated {})",
            note.topic,
            note.problem_count,
            if note.problem_count == 1 { "" } else { "s" },
            note.last_updated.format("%b %-d, %Y")
        )?;
    }
    Ok(())
}

/// Print the note for one topic.
pub fn handle_note(session: &StudySession, topic: &str, out: &mut dyn Write) -> Result<()> {
    let note = session
        .notes()
        .get(topic)
        .with_context(|| format!("No notes for topic {topic:?}"))?;
    write_note(out, note)?;
    Ok(())
}

/// Rename a topic, reporting conflicts as errors.
pub fn handle_rename(
    session: &mut StudySession,
    old: &str,
    new: &str,
    out: &mut dyn Write,
) -> Result<()> {
    if session.notes().get(old).is_none() {
        writeln!(out, "No topic named {old:?}; nothing renamed.")?;
        return Ok(());
    }
    session
        .rename_topic(old, new)
        .with_context(|| format!("Cannot rename {old:?}"))?;
    writeln!(out, "Renamed {old:?} to {:?}", new.trim())?;
    Ok(())
}

/// Print totals across all notes.
pub fn handle_stats(session: &StudySession, out: &mut dyn Write) -> Result<()> {
    let stats = session.notes().stats();
    writeln!(out, "Topics studied:   {}", stats.topics_studied)?;
    writeln!(out, "Problems solved:  {}", stats.problems_solved)?;
    writeln!(out, "Concepts learned: {}", stats.concepts_learned)?;
    writeln!(out, "History entries:  {}", session.history().len())?;

    let storage = session
        .store()
        .storage()
        .get_stats()
        .context("Failed to read storage statistics")?;
    writeln!(
        out,
        "Stored state:     {} blobs, {} bytes",
        storage.blob_count, storage.blob_bytes
    )?;
    Ok(())
}

/// Show or clear the chat transcript.
pub fn handle_chat(
    session: &mut StudySession,
    command: ChatCommands,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        ChatCommands::Show => {
            for message in session.chat().messages() {
                let speaker = if message.is_user { "You" } else { "Tutor" };
                writeln!(
                    out,
                    "[{}] {}: {}",
                    message.timestamp.format("%H:%M"),
                    speaker,
                    message.text
                )?;
            }
        }
        ChatCommands::Ask { message, reply } => {
            let relay = ReplayRelay::from_file(&reply)
                .with_context(|| format!("Cannot read tutor reply {}", reply.display()))?;
            match session.send_chat(&relay, &message) {
                Some(answer) => writeln!(out, "Tutor: {}", answer.text)?,
                None => writeln!(out, "Nothing to ask.")?,
            }
        }
        ChatCommands::Clear => {
            session.clear_chat();
            writeln!(out, "Chat history cleared.")?;
        }
    }
    Ok(())
}

fn write_solution(out: &mut dyn Write, item: &HistoryItem) -> std::io::Result<()> {
    writeln!(out, "{}", item.solution.explanation)?;
    for (n, step) in item.solution.steps.iter().enumerate() {
        writeln!(out, "  {}. {}", n + 1, step)?;
    }
    Ok(())
}

fn write_note(out: &mut dyn Write, note: &TopicNote) -> std::io::Result<()> {
    writeln!(out, "{}", note.topic)?;
    writeln!(
        out,
        "{} problems solved, last updated {}",
        note.problem_count,
        note.last_updated.format("%b %-d, %Y")
    )?;
    for (heading, entries) in [
        ("Key Concepts", &note.concepts),
        ("Key Formulas & Equations", &note.key_formulas),
        ("Example Problems", &note.examples),
    ] {
        writeln!(out, "\n{heading}")?;
        for entry in entries {
            writeln!(out, "  - {entry}")?;
        }
    }
    Ok(())
}

/// First `max_chars` characters of `text`, with an ellipsis if cut.
fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("Solve for x", 60), "Solve for x");
    }

    #[test]
    fn test_preview_cuts_on_chars() {
        assert_eq!(preview("√√√√√", 3), "√√√...");
        assert_eq!(preview("abc def", 4), "abc...");
    }
}
