// tests for the session state machine

mod common;

use common::{FakeTranscripts, ScriptedResolver, session};
use vidchat::{Error, FeedbackLog, FeedbackRecord, Message, Rating, Role};

#[tokio::test]
async fn test_full_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("feedback.jsonl");
    let (gpt, calls) = ScriptedResolver::replying("It's about X.");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::with(&[("url1", "T")]), &log);

    session.load_transcript("url1").await.unwrap();
    session.select_resolver("gpt").unwrap();
    let reply = session.ask("What is this about?").await.unwrap();
    assert_eq!(reply, "It's about X.");

    assert_eq!(
        calls.all(),
        vec![vec![Message {
            content: "Context: T\nQuestion: What is this about?".to_string(),
            role: Role::User,
        }]]
    );

    // the resolver sees exactly this json
    let sent = serde_json::to_value(&calls.all()[0]).unwrap();
    assert_eq!(
        sent,
        serde_json::json!([{"content": "Context: T\nQuestion: What is this about?", "role": "user"}])
    );

    assert_eq!(session.record_feedback("positive").unwrap(), Rating::Positive);
    assert_eq!(
        FeedbackLog::new(&log).read_all().unwrap(),
        vec![FeedbackRecord {
            question: "What is this about?".to_string(),
            response: "It's about X.".to_string(),
            rating: Rating::Positive,
        }]
    );
}

#[tokio::test]
async fn test_ask_goes_to_selected_resolver_only() {
    let dir = tempfile::tempdir().unwrap();
    let (claude, claude_calls) = ScriptedResolver::replying("from claude");
    let (gpt, gpt_calls) = ScriptedResolver::replying("from gpt");
    let mut session = session(
        vec![("claude", claude), ("gpt", gpt)],
        FakeTranscripts::default(),
        &dir.path().join("feedback.jsonl"),
    );

    session.select_resolver("gpt").unwrap();
    assert_eq!(session.ask("hi").await.unwrap(), "from gpt");
    assert_eq!(gpt_calls.len(), 1);
    assert_eq!(claude_calls.len(), 0);

    session.select_resolver("claude").unwrap();
    assert_eq!(session.ask("hi again").await.unwrap(), "from claude");
    assert_eq!(gpt_calls.len(), 1);
    assert_eq!(claude_calls.len(), 1);
}

#[tokio::test]
async fn test_ask_without_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("feedback.jsonl");
    let (gpt, calls) = ScriptedResolver::replying("nope");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::default(), &log);

    let err = session.ask("anyone there?").await.unwrap_err();
    assert!(matches!(err, Error::NoResolverSelected));
    assert_eq!(err.to_string(), "Please select an AI model first.");

    assert_eq!(calls.len(), 0);
    assert!(!session.has_pending_answer());
    assert!(!log.exists());
}

#[tokio::test]
async fn test_empty_transcript_still_builds_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let (gpt, calls) = ScriptedResolver::replying("ok");
    let mut session = session(
        vec![("gpt", gpt)],
        FakeTranscripts::default(),
        &dir.path().join("feedback.jsonl"),
    );

    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();
    assert_eq!(calls.all()[0][0].content, "Context: \nQuestion: Q");
}

#[tokio::test]
async fn test_first_reply_wins() {
    let dir = tempfile::tempdir().unwrap();
    let (gpt, _) = ScriptedResolver::replying_many(&["first", "second"]);
    let mut session = session(
        vec![("gpt", gpt)],
        FakeTranscripts::default(),
        &dir.path().join("feedback.jsonl"),
    );

    session.select_resolver("gpt").unwrap();
    assert_eq!(session.ask("Q").await.unwrap(), "first");
    assert_eq!(session.last_response(), Some("first"));
}

#[tokio::test]
async fn test_no_reply_is_a_query_error() {
    let dir = tempfile::tempdir().unwrap();
    let (gpt, _) = ScriptedResolver::replying_many(&[]);
    let mut session = session(
        vec![("gpt", gpt)],
        FakeTranscripts::default(),
        &dir.path().join("feedback.jsonl"),
    );

    session.select_resolver("gpt").unwrap();
    let err = session.ask("Q").await.unwrap_err();
    assert!(matches!(err, Error::ResolverQuery(_)));
    assert!(!session.has_pending_answer());
}

#[tokio::test]
async fn test_resolver_failure_keeps_previous_answer() {
    let dir = tempfile::tempdir().unwrap();
    let (good, _) = ScriptedResolver::replying("R");
    let (bad, _) = ScriptedResolver::failing("rate limited");
    let mut session = session(
        vec![("good", good), ("bad", bad)],
        FakeTranscripts::default(),
        &dir.path().join("feedback.jsonl"),
    );

    session.select_resolver("good").unwrap();
    session.ask("Q").await.unwrap();

    session.select_resolver("bad").unwrap();
    let err = session.ask("Q2").await.unwrap_err();
    assert!(matches!(err, Error::ResolverQuery(ref m) if m.contains("rate limited")));

    assert_eq!(session.last_question(), Some("Q"));
    assert_eq!(session.last_response(), Some("R"));
}

#[tokio::test]
async fn test_feedback_without_answer() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("feedback.jsonl");
    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::default(), &log);

    // right after startup
    assert!(matches!(
        session.record_feedback("positive"),
        Err(Error::NoPendingAnswer)
    ));
    assert!(!log.exists());

    // right after a successful rating
    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();
    session.record_feedback("negative").unwrap();
    assert!(matches!(
        session.record_feedback("negative"),
        Err(Error::NoPendingAnswer)
    ));
    assert_eq!(FeedbackLog::new(&log).read_all().unwrap().len(), 1);
}

#[tokio::test]
async fn test_feedback_round_trip_clears_pending() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("feedback.jsonl");
    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::default(), &log);

    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();
    assert_eq!(session.last_question(), Some("Q"));
    assert_eq!(session.last_response(), Some("R"));

    session.record_feedback("positive").unwrap();
    assert_eq!(session.last_question(), None);
    assert_eq!(session.last_response(), None);

    let records = FeedbackLog::new(&log).read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "Q");
    assert_eq!(records[0].response, "R");
    assert_eq!(records[0].rating, Rating::Positive);
}

#[tokio::test]
async fn test_invalid_rating_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("feedback.jsonl");
    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::default(), &log);

    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();

    let err = session.record_feedback("meh").unwrap_err();
    assert!(matches!(err, Error::InvalidRating(ref r) if r == "meh"));
    assert!(session.has_pending_answer());
    assert!(!log.exists());
}

#[tokio::test]
async fn test_transcript_failure_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(
        vec![("gpt", gpt)],
        FakeTranscripts::with(&[("good", "the transcript")]),
        &dir.path().join("feedback.jsonl"),
    );

    // never loaded: stays empty
    let err = session.load_transcript("bad").await.unwrap_err();
    assert!(matches!(err, Error::Transcript(_)));
    assert_eq!(session.transcript(), "");

    session.load_transcript("good").await.unwrap();
    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();

    session.load_transcript("bad").await.unwrap_err();
    assert_eq!(session.transcript(), "the transcript");
    assert_eq!(session.last_question(), Some("Q"));
    assert_eq!(session.last_response(), Some("R"));
}

#[tokio::test]
async fn test_new_transcript_keeps_pending_answer() {
    let dir = tempfile::tempdir().unwrap();
    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(
        vec![("gpt", gpt)],
        FakeTranscripts::with(&[("one", "first video"), ("two", "second video")]),
        &dir.path().join("feedback.jsonl"),
    );

    session.load_transcript("one").await.unwrap();
    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();

    let chars = session.load_transcript("two").await.unwrap();
    assert_eq!(chars, "second video".len());
    assert_eq!(session.transcript(), "second video");
    assert!(session.has_pending_answer());
}

#[tokio::test]
async fn test_select_resolver() {
    let dir = tempfile::tempdir().unwrap();
    let (gpt, calls) = ScriptedResolver::replying("R");
    let mut session = session(
        vec![("gpt", gpt)],
        FakeTranscripts::with(&[("url", "T")]),
        &dir.path().join("feedback.jsonl"),
    );

    let err = session.select_resolver("llama").unwrap_err();
    assert!(matches!(err, Error::UnknownResolver(ref n) if n == "llama"));
    assert_eq!(session.active_resolver(), None);

    session.load_transcript("url").await.unwrap();
    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();

    // idempotent, and switching never drops the transcript or the answer
    session.select_resolver("gpt").unwrap();
    assert_eq!(session.active_resolver(), Some("gpt"));
    assert_eq!(session.transcript(), "T");
    assert_eq!(session.last_response(), Some("R"));
    assert_eq!(calls.len(), 1);

    // a failed switch keeps the current one
    session.select_resolver("llama").unwrap_err();
    assert_eq!(session.active_resolver(), Some("gpt"));
}

#[tokio::test]
async fn test_new_answer_replaces_pending() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("feedback.jsonl");
    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::default(), &log);

    session.select_resolver("gpt").unwrap();
    session.ask("first").await.unwrap();
    session.ask("second").await.unwrap();
    session.record_feedback("down").unwrap();

    let records = FeedbackLog::new(&log).read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].question, "second");
    assert_eq!(records[0].rating, Rating::Negative);
}

#[tokio::test]
async fn test_unwritable_log_keeps_pending_answer() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the log file should be
    let log = dir.path().join("taken");
    std::fs::create_dir(&log).unwrap();

    let (gpt, _) = ScriptedResolver::replying("R");
    let mut session = session(vec![("gpt", gpt)], FakeTranscripts::default(), &log);

    session.select_resolver("gpt").unwrap();
    session.ask("Q").await.unwrap();

    let err = session.record_feedback("positive").unwrap_err();
    assert!(matches!(err, Error::FeedbackLog(_)));
    assert!(session.has_pending_answer());
}
