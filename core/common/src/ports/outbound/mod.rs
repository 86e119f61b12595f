//! Outbound ポート: ブリッジが外界（シリアル線・表示面・環境変数・ログ等）を使うための trait
//!
//! HTTP 送信のポートは common::llm::ChatTransport。

pub mod env_resolver;
pub mod line_channel;
pub mod log;
pub mod screen;
pub mod sleeper;

pub use env_resolver::EnvResolver;
pub use line_channel::{LineChannel, LineEvent};
pub use log::{now_iso8601, Log, LogLevel, LogRecord};
pub use screen::{Activity, Screen};
pub use sleeper::Sleeper;
