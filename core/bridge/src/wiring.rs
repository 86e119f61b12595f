//! 配線: 標準アダプタで TurnUseCase とチャネルを組み立てる

use std::sync::Arc;

use common::adapter::{FileJsonLog, SerialLineChannel, StderrLog, StdSleeper, StdioLineChannel, TeeLog, TextScreen};
use common::error::Error;
use common::history::HistoryBuffer;
use common::llm::{create_transport, ChatTransport, TransportType};
use common::ports::outbound::{EnvResolver, LineChannel, Log, LogLevel, LogRecord};

use crate::adapter::{BridgeSettings, NoopInterruptChecker, SigintChecker};
use crate::domain::ChannelSpec;
use crate::ports::inbound::RunBridge;
use crate::ports::outbound::InterruptChecker;
use crate::usecase::{TurnDeps, TurnSettings, TurnUseCase};

/// 組み立て済みのアプリ
pub struct App {
    pub turn: TurnUseCase,
    pub channel: Box<dyn LineChannel>,
    pub interrupt: Arc<dyn InterruptChecker>,
    pub log: Arc<dyn Log>,
    summary_fields: Vec<(&'static str, serde_json::Value)>,
}

/// ログ出力先: stderr（verbose なら Debug まで）+ 設定されていれば JSONL ファイル
pub fn wire_log(settings: &BridgeSettings) -> Arc<dyn Log> {
    let level = if settings.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Warn
    };
    let stderr: Arc<dyn Log> = Arc::new(StderrLog::new(level));
    match settings.log_file {
        Some(ref path) => {
            let file: Arc<dyn Log> = Arc::new(FileJsonLog::new(path));
            Arc::new(TeeLog::new(vec![stderr, file])) as Arc<dyn Log>
        }
        None => stderr,
    }
}

pub fn wire_transport(
    settings: &BridgeSettings,
    env: &dyn EnvResolver,
) -> Result<Arc<dyn ChatTransport>, Error> {
    let api_key = match settings.transport {
        TransportType::OpenAi => Some(env.var(&settings.api_key_env).ok_or_else(|| {
            Error::env(format!(
                "{} is not set (use --echo to run without an API key)",
                settings.api_key_env
            ))
        })?),
        TransportType::Echo => None,
    };
    let transport = create_transport(
        settings.transport,
        settings.base_url.clone(),
        api_key,
        settings.timeout,
    )?;
    let transport: Arc<dyn ChatTransport> = Arc::new(transport);
    Ok(transport)
}

fn wire_channel(
    spec: &ChannelSpec,
    log: &Arc<dyn Log>,
) -> Result<(Box<dyn LineChannel>, Arc<dyn InterruptChecker>), Error> {
    match spec {
        // stdin の read はブロックするので SIGINT は既定動作（即終了）に任せる
        ChannelSpec::Stdio => {
            let channel: Box<dyn LineChannel> = Box::new(StdioLineChannel::stdio());
            let interrupt: Arc<dyn InterruptChecker> = Arc::new(NoopInterruptChecker);
            Ok((channel, interrupt))
        }
        ChannelSpec::Serial { device, baud } => {
            let channel: Box<dyn LineChannel> = Box::new(SerialLineChannel::open(device, *baud)?);
            let interrupt: Arc<dyn InterruptChecker> = match SigintChecker::new() {
                Ok(c) => Arc::new(c) as Arc<dyn InterruptChecker>,
                Err(e) => {
                    let _ = log.log(
                        &LogRecord::now(LogLevel::Warn, format!("Failed to install SIGINT handler: {}", e))
                            .layer("wiring")
                            .kind("error"),
                    );
                    Arc::new(NoopInterruptChecker)
                }
            };
            Ok((channel, interrupt))
        }
    }
}

/// 配線: 設定から App を組み立てる
pub fn wire_bridge(settings: &BridgeSettings, env: &dyn EnvResolver) -> Result<App, Error> {
    let log = wire_log(settings);
    let transport = wire_transport(settings, env)?;
    let history = HistoryBuffer::with_capacity(settings.history_capacity)
        .map_err(|e| Error::config(e.to_string()))?;
    let (channel, interrupt) = wire_channel(&settings.channel, &log)?;

    let summary_fields = vec![
        ("transport", serde_json::json!(transport.name())),
        ("model", serde_json::json!(settings.model.model)),
        ("channel", serde_json::json!(settings.channel.describe())),
        ("history_capacity", serde_json::json!(settings.history_capacity)),
    ];

    let turn = TurnUseCase::new(
        TurnDeps {
            transport,
            screen: Box::new(TextScreen::stderr()),
            sleeper: Arc::new(StdSleeper),
            log: Arc::clone(&log),
        },
        TurnSettings {
            model: settings.model.clone(),
            system_instruction: settings.system_instruction.clone(),
            dwell: settings.dwell,
            error_reply: settings.error_reply,
        },
        history,
    );

    Ok(App {
        turn,
        channel,
        interrupt,
        log,
        summary_fields,
    })
}

impl App {
    #[allow(dead_code)] // テストで使用（チャネル・トランスポートを差し替えて組み立てる）
    pub fn new(
        turn: TurnUseCase,
        channel: Box<dyn LineChannel>,
        interrupt: Arc<dyn InterruptChecker>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            turn,
            channel,
            interrupt,
            log,
            summary_fields: Vec::new(),
        }
    }
}

impl RunBridge for App {
    fn run(&mut self) -> Result<i32, Error> {
        let mut started = LogRecord::now(LogLevel::Info, "bridge started")
            .layer("cli")
            .kind("lifecycle");
        for (k, v) in &self.summary_fields {
            started = started.field(k, v.clone());
        }
        let _ = self.log.log(&started);

        self.turn.start();
        let result = self.turn.serve(self.channel.as_mut(), self.interrupt.as_ref());

        match result {
            Ok(summary) => {
                let _ = self.log.log(
                    &LogRecord::now(LogLevel::Info, "bridge stopped")
                        .layer("cli")
                        .kind("lifecycle")
                        .field("turns", serde_json::json!(summary.turns))
                        .field("succeeded", serde_json::json!(summary.succeeded))
                        .field("failed", serde_json::json!(summary.failed)),
                );
                Ok(0)
            }
            Err(e) => {
                let _ = self.log.log(
                    &LogRecord::now(LogLevel::Error, e.to_string())
                        .layer("cli")
                        .kind("error"),
                );
                Err(e)
            }
        }
    }
}
