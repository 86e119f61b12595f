//! エラーハンドリング
//!
//! 1 ターンの失敗種別（transport / envelope / content）と、
//! 起動時の設定・引数・I/O エラーをひとつの enum で扱う。

use thiserror::Error as ThisError;

/// エラー型
///
/// `exit_code()` で sysexits 相当の終了コードを返す。
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// 接続失敗・タイムアウト・非 2xx ステータス
    #[error("transport error: {0}")]
    Transport(String),
    /// 外側 JSON（choices[0].message.content）の取り出し失敗
    #[error("envelope decode error: {0}")]
    EnvelopeDecode(String),
    /// 内側 JSON（{long, short}）の取り出し失敗
    #[error("content decode error: {0}")]
    ContentDecode(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("environment error: {0}")]
    Env(String),
    #[error("{0}")]
    InvalidArgument(String),
}

impl Error {
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    pub fn envelope(msg: impl Into<String>) -> Self {
        Error::EnvelopeDecode(msg.into())
    }

    pub fn content(msg: impl Into<String>) -> Self {
        Error::ContentDecode(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Error::Env(msg.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// 使い方の誤り（usage を表示すべきか）
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// ターン単位で回復可能なエラーか（ループは継続する）
    pub fn is_turn_error(&self) -> bool {
        matches!(
            self,
            Error::Transport(_) | Error::EnvelopeDecode(_) | Error::ContentDecode(_)
        )
    }

    /// ログやエラー応答行に使う短い識別子
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::EnvelopeDecode(_) => "envelope",
            Error::ContentDecode(_) => "content",
            Error::Io(_) => "io",
            Error::Config(_) => "config",
            Error::Env(_) => "env",
            Error::InvalidArgument(_) => "usage",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_) => 64,
            Error::EnvelopeDecode(_) | Error::ContentDecode(_) => 65,
            Error::Transport(_) => 69,
            Error::Io(_) => 74,
            Error::Config(_) | Error::Env(_) => 78,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}
