//! Session tests: the solve pipeline, rename, chat and persistence,
//! run against real RocksDB storage in a temp directory.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use mathbud::{ChatRelay, ProblemImage, RelayError, SolveRelay, StudySession};
use mathbud_storage::column_families::CF_STATE;
use mathbud_storage::{StateKey, StateStore, Storage};
use mathbud_topics::TopicsError;
use mathbud_types::{Settings, Solution, CHAT_APOLOGY, CHAT_WELCOME};

struct TestHarness {
    _temp_dir: TempDir,
    storage: Arc<Storage>,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage =
            Arc::new(Storage::open(temp_dir.path()).expect("Failed to open test storage"));
        Self {
            _temp_dir: temp_dir,
            storage,
        }
    }

    fn open(&self) -> StudySession {
        StudySession::open(StateStore::new(self.storage.clone()), &Settings::default())
            .expect("Failed to open session")
    }

    fn blob(&self, key: StateKey) -> Option<Vec<u8>> {
        self.storage
            .get(CF_STATE, key.to_bytes())
            .expect("Failed to read blob")
    }
}

struct FixedSolve(Solution);

impl SolveRelay for FixedSolve {
    fn solve(&self, _image: &ProblemImage) -> Result<Solution, RelayError> {
        Ok(self.0.clone())
    }
}

struct DownRelay;

impl SolveRelay for DownRelay {
    fn solve(&self, _image: &ProblemImage) -> Result<Solution, RelayError> {
        Err(RelayError::Upstream("service unavailable".to_string()))
    }
}

impl ChatRelay for DownRelay {
    fn reply(&self, _message: &str) -> Result<String, RelayError> {
        Err(RelayError::Upstream("service unavailable".to_string()))
    }
}

struct EchoTutor;

impl ChatRelay for EchoTutor {
    fn reply(&self, message: &str) -> Result<String, RelayError> {
        Ok(format!("You asked: {message}"))
    }
}

fn png() -> ProblemImage {
    ProblemImage::new("image/png", vec![0x89, b'P', b'N', b'G']).unwrap()
}

fn quadratic() -> Solution {
    Solution::new(
        "This is a quadratic equation. We solve by factoring.",
        vec![
            "Step one: x^2 - 5x + 6 = 0".to_string(),
            "Step two: factor into (x-2)(x-3)=0".to_string(),
        ],
    )
}

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

#[test]
fn test_relay_failure_records_nothing() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    let result = session.solve(&DownRelay, &png());

    assert!(matches!(result, Err(RelayError::Upstream(_))));
    assert!(session.history().is_empty());
    assert!(session.notes().is_empty());
    assert_eq!(harness.blob(StateKey::History), None);
    assert_eq!(harness.blob(StateKey::Notes), None);
}

#[test]
fn test_solve_files_problem_under_detected_topics() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    let outcome = session.solve(&FixedSolve(quadratic()), &png()).unwrap();

    assert_eq!(outcome.topics, vec!["Quadratic Equations", "Factoring"]);
    assert_eq!(outcome.item.solution, quadratic());
    assert_eq!(
        outcome.item.problem_type.as_deref(),
        Some("Quadratic Equations")
    );
    assert_eq!(session.history().items(), &[outcome.item.clone()]);

    for topic in ["Quadratic Equations", "Factoring"] {
        let note = session.notes().get(topic).unwrap();
        assert_eq!(note.problem_count, 1);
        assert_eq!(
            note.concepts,
            vec!["This is a quadratic equation", "We solve by factoring"]
        );
        assert_eq!(note.examples, quadratic().steps);
        assert_eq!(note.key_formulas, quadratic().steps);
    }
    assert!(session.notes().get("Algebra").is_none());
}

#[test]
fn test_repeat_problem_counts_but_does_not_duplicate() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    session.record_solution_at(quadratic(), at(0));
    session.record_solution_at(quadratic(), at(5));

    let note = session.notes().get("Factoring").unwrap();
    assert_eq!(note.problem_count, 2);
    assert_eq!(note.concepts.len(), 2);
    assert_eq!(note.last_updated, at(5));
    assert_eq!(session.history().len(), 2);

    let stats = session.notes().stats();
    assert_eq!(stats.topics_studied, 2);
    assert_eq!(stats.problems_solved, 4);
    assert_eq!(stats.concepts_learned, 4);
}

#[test]
fn test_state_survives_reopen() {
    let harness = TestHarness::new();
    let recorded = {
        let mut session = harness.open();
        session.record_solution_at(quadratic(), at(0));
        session
            .record_solution_at(Solution::new("Add the numbers.", vec!["2 + 3 = 5".into()]), at(1))
            .item
    };

    let session = harness.open();

    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history().items()[0], recorded);
    assert_eq!(
        session.history().items()[0].problem_type.as_deref(),
        Some("General Math")
    );
    assert_eq!(session.notes().len(), 3);
    assert_eq!(session.notes().get("General Math").unwrap().problem_count, 1);
}

#[test]
fn test_ids_are_unique_within_one_millisecond() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    let ids: Vec<String> = (0..5)
        .map(|_| session.record_solution_at(quadratic(), at(0)).item.id)
        .collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5);
}

#[test]
fn test_ids_stay_unique_after_reopen() {
    let harness = TestHarness::new();
    let first = harness.open().record_solution_at(quadratic(), at(0)).item.id;

    let second = harness.open().record_solution_at(quadratic(), at(0)).item.id;

    assert_ne!(first, second);
}

#[test]
fn test_history_keeps_newest_fifty() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    let ids: Vec<String> = (0..60)
        .map(|n| session.record_solution_at(quadratic(), at(n)).item.id)
        .collect();

    assert_eq!(session.history().len(), 50);
    assert_eq!(session.history().items()[0].id, ids[59]);
    assert_eq!(session.history().items()[49].id, ids[10]);
    assert_eq!(harness.open().history().len(), 50);
}

#[test]
fn test_rename_moves_note_and_persists() {
    let harness = TestHarness::new();
    let mut session = harness.open();
    session.record_solution_at(quadratic(), at(0));
    let before = session.notes().get("Factoring").unwrap().clone();

    session.rename_topic("Factoring", "  Factorising ").unwrap();

    assert!(session.notes().get("Factoring").is_none());
    let after = session.notes().get("Factorising").unwrap();
    assert_eq!(after.topic, "Factorising");
    assert_eq!(after.concepts, before.concepts);
    assert_eq!(after.problem_count, before.problem_count);

    let reopened = harness.open();
    assert!(reopened.notes().get("Factorising").is_some());
    assert!(reopened.notes().get("Factoring").is_none());
}

#[test]
fn test_rename_conflict_leaves_notes_untouched() {
    let harness = TestHarness::new();
    let mut session = harness.open();
    session.record_solution_at(quadratic(), at(0));
    let before = session.notes().clone();

    let result = session.rename_topic("Factoring", "quadratic equations");

    assert!(matches!(result, Err(TopicsError::NameConflict { .. })));
    assert_eq!(session.notes(), &before);
}

#[test]
fn test_rename_unknown_topic_is_noop() {
    let harness = TestHarness::new();
    let mut session = harness.open();
    session.record_solution_at(quadratic(), at(0));
    let before = session.notes().clone();

    session.rename_topic("Geometry", "Shapes").unwrap();

    assert_eq!(session.notes(), &before);
}

#[test]
fn test_new_session_greets_student() {
    let harness = TestHarness::new();
    let session = harness.open();

    let messages = session.chat().messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, CHAT_WELCOME);
    assert!(!messages[0].is_user);
    assert_eq!(harness.blob(StateKey::Chat), None);
}

#[test]
fn test_chat_exchange_is_recorded_and_persisted() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    let reply = session.send_chat(&EchoTutor, "  what is a root? ").unwrap();
    assert_eq!(reply.text, "You asked: what is a root?");

    let texts: Vec<&str> = session
        .chat()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![CHAT_WELCOME, "what is a root?", "You asked: what is a root?"]
    );

    let reopened = harness.open();
    assert_eq!(reopened.chat().messages(), session.chat().messages());
}

#[test]
fn test_chat_relay_failure_apologizes() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    let reply = session.send_chat(&DownRelay, "help").unwrap();

    assert_eq!(reply.text, CHAT_APOLOGY);
    assert!(!reply.is_user);
    assert_eq!(session.chat().len(), 3);
    assert!(session.chat().messages()[1].is_user);
}

#[test]
fn test_blank_chat_is_ignored() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    assert!(session.send_chat(&EchoTutor, "   ").is_none());
    assert_eq!(session.chat().len(), 1);
}

#[test]
fn test_clear_chat_restores_welcome() {
    let harness = TestHarness::new();
    let mut session = harness.open();
    session.send_chat(&EchoTutor, "hi");

    session.clear_chat();

    assert_eq!(session.chat().len(), 1);
    assert_eq!(session.chat().messages()[0].text, CHAT_WELCOME);
    assert_eq!(harness.blob(StateKey::Chat), None);
    assert_eq!(harness.open().chat().len(), 1);
}

#[test]
fn test_chat_does_not_touch_notes_or_history() {
    let harness = TestHarness::new();
    let mut session = harness.open();

    session.send_chat(&EchoTutor, "Explain quadratic factoring");

    assert!(session.notes().is_empty());
    assert!(session.history().is_empty());
}
