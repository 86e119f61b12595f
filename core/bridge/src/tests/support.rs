//! テスト用のアダプタ

use crate::ports::outbound::InterruptChecker;
use crate::usecase::{TurnDeps, TurnSettings, TurnUseCase};
use common::adapter::NoopLog;
use common::error::Error;
use common::history::HistoryBuffer;
use common::llm::{ChatRequest, ChatTransport, ModelSettings, SYSTEM_INSTRUCTION};
use common::ports::outbound::{Activity, LineChannel, LineEvent, Screen, Sleeper};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LS_CONTENT: &str = r#"{"long":"L","short":"S"}"#;

/// content をそのまま choices[0].message.content に入れた envelope
pub fn envelope(content: &str) -> String {
    serde_json::json!({"choices": [{"message": {"content": content}}]}).to_string()
}

/// 事前に積んだ応答を順に返し、受け取ったリクエストを記録する
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<String, Error>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<String, Error>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl ChatTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    fn send(&self, request: &ChatRequest) -> Result<String, Error> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("no scripted response left")))
    }
}

/// 画面への呼び出しを記録する
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenCall {
    Listening,
    Query(String),
    Answer(String),
    Activity(Activity),
}

#[derive(Clone, Default)]
pub struct RecordingScreen {
    pub calls: Arc<Mutex<Vec<ScreenCall>>>,
}

impl RecordingScreen {
    pub fn calls(&self) -> Vec<ScreenCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Screen for RecordingScreen {
    fn show_listening(&mut self) -> Result<(), Error> {
        self.calls.lock().unwrap().push(ScreenCall::Listening);
        Ok(())
    }

    fn show_query(&mut self, query: &str) -> Result<(), Error> {
        self.calls.lock().unwrap().push(ScreenCall::Query(query.to_string()));
        Ok(())
    }

    fn show_answer(&mut self, short: &str) -> Result<(), Error> {
        self.calls.lock().unwrap().push(ScreenCall::Answer(short.to_string()));
        Ok(())
    }

    fn set_activity(&mut self, activity: Activity) -> Result<(), Error> {
        self.calls.lock().unwrap().push(ScreenCall::Activity(activity));
        Ok(())
    }
}

/// 常に失敗する画面（表示面の故障でターンが止まらないことの確認用）
pub struct BrokenScreen;

impl Screen for BrokenScreen {
    fn show_listening(&mut self) -> Result<(), Error> {
        Err(Error::io_msg("i2c nack"))
    }

    fn show_query(&mut self, _query: &str) -> Result<(), Error> {
        Err(Error::io_msg("i2c nack"))
    }

    fn show_answer(&mut self, _short: &str) -> Result<(), Error> {
        Err(Error::io_msg("i2c nack"))
    }

    fn set_activity(&mut self, _activity: Activity) -> Result<(), Error> {
        Err(Error::io_msg("i2c nack"))
    }
}

/// 入力行を順に返し、書かれた行を記録する
#[derive(Default)]
pub struct MemoryChannel {
    pub incoming: VecDeque<LineEvent>,
    pub written: Vec<String>,
    pub fail_writes: bool,
}

impl MemoryChannel {
    pub fn with_lines(lines: &[&str]) -> Self {
        Self {
            incoming: lines.iter().map(|l| LineEvent::Line(l.to_string())).collect(),
            ..Default::default()
        }
    }
}

impl LineChannel for MemoryChannel {
    fn read_line(&mut self) -> Result<LineEvent, Error> {
        Ok(self.incoming.pop_front().unwrap_or(LineEvent::Closed))
    }

    fn write_line(&mut self, line: &str) -> Result<(), Error> {
        if self.fail_writes {
            return Err(Error::io_msg("serial write failed"));
        }
        self.written.push(line.to_string());
        Ok(())
    }
}

/// 待たずに要求時間だけ記録する
#[derive(Default)]
pub struct RecordingSleeper {
    pub slept: Mutex<Vec<Duration>>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// 指定回数の問い合わせ後に停止を要求する
pub struct InterruptAfter {
    remaining: Mutex<usize>,
}

impl InterruptAfter {
    pub fn new(checks: usize) -> Self {
        Self {
            remaining: Mutex::new(checks),
        }
    }
}

impl InterruptChecker for InterruptAfter {
    fn is_interrupted(&self) -> bool {
        let mut remaining = self.remaining.lock().unwrap();
        if *remaining == 0 {
            return true;
        }
        *remaining -= 1;
        false
    }
}

pub struct Never;

impl InterruptChecker for Never {
    fn is_interrupted(&self) -> bool {
        false
    }
}

pub fn settings(error_reply: bool) -> TurnSettings {
    TurnSettings {
        model: ModelSettings::default(),
        system_instruction: SYSTEM_INSTRUCTION.to_string(),
        dwell: Duration::from_millis(5000),
        error_reply,
    }
}

/// テスト用の一式
pub struct Harness {
    pub turn: TurnUseCase,
    pub transport: Arc<ScriptedTransport>,
    pub screen: RecordingScreen,
    pub sleeper: Arc<RecordingSleeper>,
}

pub fn harness(responses: Vec<Result<String, Error>>, history: HistoryBuffer, error_reply: bool) -> Harness {
    let transport = ScriptedTransport::new(responses);
    let screen = RecordingScreen::default();
    let sleeper = Arc::new(RecordingSleeper::default());
    let turn = TurnUseCase::new(
        TurnDeps {
            transport: transport.clone(),
            screen: Box::new(screen.clone()),
            sleeper: sleeper.clone(),
            log: Arc::new(NoopLog),
        },
        settings(error_reply),
        history,
    );
    Harness {
        turn,
        transport,
        screen,
        sleeper,
    }
}
