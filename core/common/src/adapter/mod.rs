//! アダプター（外界の I/O を port の trait で実装したもの）
//!
//! usecase は port 経由でのみシリアル線・表示面・ログ・時刻待ちに触れる。
//! 実装は標準実装（Std* / Serial* / Text*）やテスト用のモックを注入する。

pub mod file_json_log;
pub mod line_assembler;
#[cfg(unix)]
pub mod serial;
pub mod stderr_log;
pub mod stdio_channel;
pub mod std_env_resolver;
pub mod std_sleeper;
pub mod text_screen;

pub use file_json_log::{FileJsonLog, NoopLog, TeeLog};
pub use line_assembler::LineAssembler;
#[cfg(unix)]
pub use serial::{baud_constant, SerialLineChannel, DEFAULT_BAUD};
pub use stderr_log::StderrLog;
pub use stdio_channel::StdioLineChannel;
pub use std_env_resolver::StdEnvResolver;
pub use std_sleeper::StdSleeper;
pub use text_screen::TextScreen;
