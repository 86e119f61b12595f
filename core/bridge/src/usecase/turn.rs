//! 1 ターン（受信 → リクエスト → 送信 → デコード → 履歴更新・表示）とポーリングループ
//!
//! ターンは常に 1 つずつ最後まで実行する。履歴を触るのはこのモジュールだけ。

use crate::domain::Query;
use crate::ports::outbound::InterruptChecker;
use common::domain::AnswerPair;
use common::error::Error;
use common::history::HistoryBuffer;
use common::llm::{build_request, decode_response, ChatTransport, DecodedAnswer, ModelSettings};
use common::ports::outbound::{
    Activity, LineChannel, LineEvent, Log, LogLevel, LogRecord, Screen, Sleeper,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct TurnDeps {
    pub transport: Arc<dyn ChatTransport>,
    pub screen: Box<dyn Screen>,
    pub sleeper: Arc<dyn Sleeper>,
    pub log: Arc<dyn Log>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnSettings {
    pub model: ModelSettings,
    pub system_instruction: String,
    /// short 回答を表示し続ける時間
    pub dwell: Duration,
    /// 失敗時に "ERROR <kind>" を返すか
    pub error_reply: bool,
}

/// serve の集計（終了ログ用）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub turns: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// ブリッジのユースケース（履歴を所有し、アダプター経由で I/O を行う）
pub struct TurnUseCase {
    deps: TurnDeps,
    settings: TurnSettings,
    history: HistoryBuffer,
}

impl TurnUseCase {
    pub fn new(deps: TurnDeps, settings: TurnSettings, history: HistoryBuffer) -> Self {
        Self {
            deps,
            settings,
            history,
        }
    }

    #[allow(dead_code)] // テストで使用
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// 起動直後の待機表示
    pub fn start(&mut self) {
        self.present(|s| s.set_activity(Activity::Idle));
        self.present(|s| s.show_listening());
    }

    /// 1 ターンを実行する
    ///
    /// 失敗したら履歴・シリアル線・画面（エコー表示のまま）には何も反映しない。
    /// シリアル線への書き込み失敗でも履歴は変えない。
    pub fn run_turn(
        &mut self,
        query: &Query,
        channel: &mut dyn LineChannel,
    ) -> Result<AnswerPair, Error> {
        let started = Instant::now();
        self.present(|s| s.set_activity(Activity::Busy));
        self.present(|s| s.show_query(query));
        self.log(
            LogRecord::now(LogLevel::Debug, "turn started")
                .layer("usecase")
                .kind("turn")
                .field("query_chars", serde_json::json!(query.chars().count()))
                .field("history_size", serde_json::json!(self.history.size())),
        );

        let decoded = match self.exchange(query) {
            Ok(d) => d,
            Err(e) => {
                self.present(|s| s.set_activity(Activity::Idle));
                self.log(
                    LogRecord::now(LogLevel::Warn, format!("turn failed: {}", e))
                        .layer("usecase")
                        .kind("turn")
                        .field("error_kind", serde_json::json!(e.kind()))
                        .field("latency_ms", serde_json::json!(started.elapsed().as_millis() as u64)),
                );
                return Err(e);
            }
        };

        let DecodedAnswer { answer, content } = decoded;
        self.present(|s| s.show_answer(&answer.short));
        channel.write_line(&single_line(&answer.long))?;
        // ホストに届いたターンだけを積む（assistant 側はデコード前の content のまま）
        self.history.push_turn(query.as_str(), content);
        self.log(
            LogRecord::now(LogLevel::Info, "turn finished")
                .layer("usecase")
                .kind("turn")
                .field("latency_ms", serde_json::json!(started.elapsed().as_millis() as u64))
                .field("history_size", serde_json::json!(self.history.size())),
        );

        self.deps.sleeper.sleep(self.settings.dwell);
        self.present(|s| s.show_listening());
        self.present(|s| s.set_activity(Activity::Idle));
        Ok(answer)
    }

    /// ポーリングループ。チャネルが閉じるか停止要求があるまで行を処理する。
    ///
    /// ターン単位の失敗（transport / envelope / content）はログに残して継続する。
    /// シリアル線自体の I/O エラーは呼び出し元へ返す。
    pub fn serve(
        &mut self,
        channel: &mut dyn LineChannel,
        interrupt: &dyn InterruptChecker,
    ) -> Result<ServeSummary, Error> {
        let mut summary = ServeSummary::default();
        loop {
            if interrupt.is_interrupted() {
                self.log(
                    LogRecord::now(LogLevel::Info, "interrupted")
                        .layer("usecase")
                        .kind("lifecycle"),
                );
                break;
            }
            let line = match channel.read_line()? {
                LineEvent::Line(line) => line,
                LineEvent::Idle => continue,
                LineEvent::Closed => break,
            };
            let Some(query) = Query::parse(&line) else {
                continue;
            };
            summary.turns += 1;
            match self.run_turn(&query, channel) {
                Ok(_) => summary.succeeded += 1,
                Err(e) if e.is_turn_error() => {
                    summary.failed += 1;
                    if self.settings.error_reply {
                        channel.write_line(&format!("ERROR {}", e.kind()))?;
                    }
                }
                Err(e) => return Err(e),
            }
        }
        Ok(summary)
    }

    fn exchange(&self, query: &Query) -> Result<DecodedAnswer, Error> {
        let request = build_request(
            &self.settings.model,
            &self.settings.system_instruction,
            &self.history,
            query,
        );
        let raw = self.deps.transport.send(&request)?;
        self.log(
            LogRecord::now(LogLevel::Debug, "response received")
                .layer("usecase")
                .kind("turn")
                .field("transport", serde_json::json!(self.deps.transport.name()))
                .field("body_bytes", serde_json::json!(raw.len())),
        );
        decode_response(&raw)
    }

    /// 表示面の失敗はターンを止めない（ログのみ）
    fn present(&mut self, f: impl FnOnce(&mut dyn Screen) -> Result<(), Error>) {
        if let Err(e) = f(self.deps.screen.as_mut()) {
            self.log(
                LogRecord::now(LogLevel::Warn, format!("screen update failed: {}", e))
                    .layer("adapter")
                    .kind("error"),
            );
        }
    }

    fn log(&self, record: LogRecord) {
        let _ = self.deps.log.log(&record);
    }
}

/// 応答は 1 行で返す（改行はホスト側の行区切りと衝突するため空白にする）
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
