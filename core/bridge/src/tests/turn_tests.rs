//! run_turn のテスト（成功時の出力と履歴、失敗時に何も変えないこと）

use super::support::{envelope, harness, BrokenScreen, MemoryChannel, RecordingSleeper, ScreenCall, ScriptedTransport, LS_CONTENT};
use crate::domain::Query;
use crate::usecase::{TurnDeps, TurnUseCase};
use common::adapter::NoopLog;
use common::error::Error;
use common::history::HistoryBuffer;
use common::llm::{Message, Role, SYSTEM_INSTRUCTION};
use common::ports::outbound::Activity;
use std::sync::Arc;
use std::time::Duration;

fn prior_history() -> HistoryBuffer {
    let mut h = HistoryBuffer::new();
    h.push_turn("earlier", r#"{"long":"before","short":"b"}"#);
    h
}

fn snapshot(h: &HistoryBuffer) -> Vec<Message> {
    h.iter().cloned().collect()
}

#[test]
fn test_successful_turn_outputs_and_history() {
    let mut h = harness(vec![Ok(envelope(LS_CONTENT))], HistoryBuffer::new(), false);
    let mut channel = MemoryChannel::default();

    let answer = h.turn.run_turn(&Query::new("Q"), &mut channel).unwrap();

    assert_eq!(answer.long, "L");
    assert_eq!(answer.short, "S");
    assert_eq!(channel.written, vec!["L".to_string()]);
    assert_eq!(
        snapshot(h.turn.history()),
        vec![Message::user("Q"), Message::assistant(LS_CONTENT)]
    );
    assert_eq!(
        h.screen.calls(),
        vec![
            ScreenCall::Activity(Activity::Busy),
            ScreenCall::Query("Q".to_string()),
            ScreenCall::Answer("S".to_string()),
            ScreenCall::Listening,
            ScreenCall::Activity(Activity::Idle),
        ]
    );
    assert_eq!(*h.sleeper.slept.lock().unwrap(), vec![Duration::from_millis(5000)]);
}

#[test]
fn test_request_replays_history_before_query() {
    let mut h = harness(vec![Ok(envelope(LS_CONTENT))], prior_history(), false);
    let mut channel = MemoryChannel::default();
    h.turn.run_turn(&Query::new("next"), &mut channel).unwrap();

    let requests = h.transport.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let msgs = &requests[0].messages;
    assert_eq!(
        msgs,
        &vec![
            Message::system(SYSTEM_INSTRUCTION),
            Message::user("earlier"),
            Message::assistant(r#"{"long":"before","short":"b"}"#),
            Message::user("next"),
        ]
    );
    assert_eq!(requests[0].model, "gpt-3.5-turbo");
    assert_eq!(requests[0].max_tokens, 150);
}

#[test]
fn test_second_turn_sees_first_turn() {
    let mut h = harness(
        vec![Ok(envelope(LS_CONTENT)), Ok(envelope(r#"{"long":"L2","short":"S2"}"#))],
        HistoryBuffer::new(),
        false,
    );
    let mut channel = MemoryChannel::default();
    h.turn.run_turn(&Query::new("first"), &mut channel).unwrap();
    h.turn.run_turn(&Query::new("second"), &mut channel).unwrap();

    let requests = h.transport.requests.lock().unwrap();
    let roles: Vec<Role> = requests[1].messages.iter().map(|m| m.role()).collect();
    assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::User]);
    assert_eq!(requests[1].messages[2].content(), LS_CONTENT);
    assert_eq!(channel.written, vec!["L".to_string(), "L2".to_string()]);
    assert_eq!(h.turn.history().size(), 4);
}

#[test]
fn test_transport_error_leaves_everything_unchanged() {
    let mut h = harness(vec![Err(Error::transport("timed out"))], prior_history(), false);
    let before = snapshot(h.turn.history());
    let mut channel = MemoryChannel::default();

    let err = h.turn.run_turn(&Query::new("Q"), &mut channel).unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(snapshot(h.turn.history()), before);
    assert!(channel.written.is_empty());
    // 画面はエコー表示のまま（回答・待機画面には進まない）
    let calls = h.screen.calls();
    assert!(!calls.iter().any(|c| matches!(c, ScreenCall::Answer(_) | ScreenCall::Listening)));
    assert_eq!(calls[1], ScreenCall::Query("Q".to_string()));
    assert!(h.sleeper.slept.lock().unwrap().is_empty());
}

#[test]
fn test_envelope_error_leaves_history_unchanged() {
    let mut h = harness(vec![Ok("not json".to_string())], prior_history(), false);
    let before = snapshot(h.turn.history());
    let mut channel = MemoryChannel::default();

    let err = h.turn.run_turn(&Query::new("Q"), &mut channel).unwrap_err();

    assert!(matches!(err, Error::EnvelopeDecode(_)));
    assert_eq!(snapshot(h.turn.history()), before);
    assert!(channel.written.is_empty());
}

#[test]
fn test_content_error_leaves_history_unchanged() {
    let mut h = harness(vec![Ok(envelope(r#"{"long":"L"}"#))], prior_history(), false);
    let before = snapshot(h.turn.history());
    let mut channel = MemoryChannel::default();

    let err = h.turn.run_turn(&Query::new("Q"), &mut channel).unwrap_err();

    assert!(matches!(err, Error::ContentDecode(_)));
    assert_eq!(snapshot(h.turn.history()), before);
    assert!(channel.written.is_empty());
    assert!(!h
        .screen
        .calls()
        .iter()
        .any(|c| matches!(c, ScreenCall::Answer(_))));
}

#[test]
fn test_history_window_slides_over_many_turns() {
    let responses = (0..15)
        .map(|i| Ok(envelope(&format!(r#"{{"long":"L{}","short":"S{}"}}"#, i, i))))
        .collect();
    let mut h = harness(responses, HistoryBuffer::with_capacity(20).unwrap(), false);
    let mut channel = MemoryChannel::default();
    for i in 0..15 {
        h.turn.run_turn(&Query::new(format!("q{}", i)), &mut channel).unwrap();
        assert!(h.turn.history().size() <= 20);
    }
    let history = h.turn.history();
    assert_eq!(history.size(), 20);
    // 残るのは最後の 10 ターン（q5..q14）
    assert_eq!(history.at(0).unwrap(), &Message::user("q5"));
    assert_eq!(history.at(19).unwrap().content(), r#"{"long":"L14","short":"S14"}"#);
}

#[test]
fn test_multiline_long_answer_is_sent_as_one_line() {
    let mut h = harness(
        vec![Ok(envelope(r#"{"long":"first line\nsecond line","short":"S"}"#))],
        HistoryBuffer::new(),
        false,
    );
    let mut channel = MemoryChannel::default();
    h.turn.run_turn(&Query::new("Q"), &mut channel).unwrap();
    assert_eq!(channel.written, vec!["first line second line".to_string()]);
}

#[test]
fn test_broken_screen_does_not_abort_turn() {
    let transport = ScriptedTransport::new(vec![Ok(envelope(LS_CONTENT))]);
    let mut turn = TurnUseCase::new(
        TurnDeps {
            transport,
            screen: Box::new(BrokenScreen),
            sleeper: Arc::new(RecordingSleeper::default()),
            log: Arc::new(NoopLog),
        },
        super::support::settings(false),
        HistoryBuffer::new(),
    );
    let mut channel = MemoryChannel::default();
    let answer = turn.run_turn(&Query::new("Q"), &mut channel).unwrap();
    assert_eq!(answer.short, "S");
    assert_eq!(channel.written, vec!["L".to_string()]);
}

#[test]
fn test_serial_write_failure_is_io_error() {
    let mut h = harness(vec![Ok(envelope(LS_CONTENT))], prior_history(), false);
    let before = snapshot(h.turn.history());
    let mut channel = MemoryChannel {
        fail_writes: true,
        ..Default::default()
    };
    let err = h.turn.run_turn(&Query::new("Q"), &mut channel).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert!(!err.is_turn_error());
    // ホストに届かなかったターンは履歴に残さない
    assert_eq!(snapshot(h.turn.history()), before);
}
