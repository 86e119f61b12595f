//! 設定ファイル（config.json）の読み込みと CLI 引数とのマージ（adapter 層）
//!
//! 優先順位: CLI 引数 > 設定ファイル > 既定値。

use crate::cli::Config;
use crate::domain::ChannelSpec;
use common::adapter::{baud_constant, DEFAULT_BAUD};
use common::domain::DevicePath;
use common::error::Error;
use common::history::DEFAULT_HISTORY_CAPACITY;
use common::llm::openai_compat::DEFAULT_TIMEOUT;
use common::llm::request::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, SYSTEM_INSTRUCTION};
use common::llm::{ModelSettings, TransportType};
use common::ports::outbound::EnvResolver;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";
pub const DEFAULT_DWELL: Duration = Duration::from_millis(5000);

/// config.json のルート（すべて省略可）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// "openai" | "echo"
    pub transport: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    /// API キーを読む環境変数名
    pub api_key_env: Option<String>,
    pub timeout_secs: Option<u64>,
    pub history_capacity: Option<usize>,
    pub dwell_ms: Option<u64>,
    pub system_instruction: Option<String>,
    pub device: Option<PathBuf>,
    pub baud: Option<u32>,
    pub error_reply: Option<bool>,
    pub log_file: Option<PathBuf>,
}

/// マージ・検証済みの実行設定
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSettings {
    pub transport: TransportType,
    pub base_url: Option<String>,
    pub model: ModelSettings,
    pub api_key_env: String,
    pub timeout: Duration,
    pub history_capacity: usize,
    pub dwell: Duration,
    pub system_instruction: String,
    pub channel: ChannelSpec,
    pub error_reply: bool,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

/// 設定ファイルを読み込む
pub fn load_file_config(path: &Path) -> Result<FileConfig, Error> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::config(format!("Invalid config {}: {}", path.display(), e)))
}

/// 設定ファイルを探して読み込む
///
/// `explicit` 指定時は存在しなければエラー。既定パスは無ければ既定値を使う。
pub fn resolve_file_config(
    explicit: Option<&Path>,
    env: &dyn EnvResolver,
) -> Result<FileConfig, Error> {
    if let Some(path) = explicit {
        return load_file_config(path);
    }
    let Ok(path) = env.resolve_config_path() else {
        return Ok(FileConfig::default());
    };
    if !path.exists() {
        return Ok(FileConfig::default());
    }
    load_file_config(&path)
}

/// CLI 引数と設定ファイルをマージして検証する
pub fn resolve_settings(cli: &Config, file: FileConfig) -> Result<BridgeSettings, Error> {
    let transport = if cli.echo {
        TransportType::Echo
    } else {
        match file.transport.as_deref() {
            None => TransportType::OpenAi,
            Some(s) => TransportType::from_str(s)
                .ok_or_else(|| Error::config(format!("Unknown transport: {}", s)))?,
        }
    };

    let max_tokens = file.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    if max_tokens == 0 {
        return Err(Error::config("max_tokens must be at least 1"));
    }
    let model = ModelSettings {
        model: cli
            .model
            .as_ref()
            .map(|m| m.to_string())
            .or(file.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        max_tokens,
    };

    let timeout = match file.timeout_secs {
        Some(0) => return Err(Error::config("timeout_secs must be at least 1")),
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_TIMEOUT,
    };

    let history_capacity = cli
        .history
        .or(file.history_capacity)
        .unwrap_or(DEFAULT_HISTORY_CAPACITY);
    if history_capacity == 0 {
        return Err(Error::config("history capacity must be at least 1"));
    }

    let dwell = cli
        .dwell_ms
        .or(file.dwell_ms)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_DWELL);

    let channel = if cli.stdio {
        ChannelSpec::Stdio
    } else {
        let baud = cli.baud.or(file.baud).unwrap_or(DEFAULT_BAUD);
        if baud_constant(baud).is_none() {
            return Err(Error::config(format!("Unsupported baud rate: {}", baud)));
        }
        let device = cli
            .device
            .clone()
            .or_else(|| file.device.map(DevicePath::new))
            .unwrap_or_else(|| DevicePath::new(DEFAULT_DEVICE));
        ChannelSpec::Serial { device, baud }
    };

    Ok(BridgeSettings {
        transport,
        base_url: file.base_url,
        model,
        api_key_env: file
            .api_key_env
            .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
        timeout,
        history_capacity,
        dwell,
        system_instruction: file
            .system_instruction
            .unwrap_or_else(|| SYSTEM_INSTRUCTION.to_string()),
        channel,
        error_reply: cli.error_reply || file.error_reply.unwrap_or(false),
        log_file: file.log_file,
        verbose: cli.verbose,
    })
}
