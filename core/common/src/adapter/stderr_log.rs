//! 人間向けログ（LogRecord → stderr に 1 行で要点のみ出力）
//!
//! --verbose 時に使う。fields の全量は出さず要点のみ（巨大化防止）。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use std::io::Write;
use std::sync::Mutex;

const FIELDS_SUMMARY_MAX: usize = 400;

/// fields の要点だけを短い文字列にする（巨大化防止）
fn fields_summary(record: &LogRecord) -> String {
    let Some(fields) = record.fields.as_ref().filter(|f| !f.is_empty()) else {
        return String::new();
    };
    let s = serde_json::to_string(fields).unwrap_or_default();
    if s.chars().count() <= FIELDS_SUMMARY_MAX {
        return s;
    }
    let truncated = s.chars().take(FIELDS_SUMMARY_MAX).collect::<String>();
    format!("{}... (len={})", truncated, s.len())
}

/// 1 レコードを 1 行に整形する
pub fn format_line(record: &LogRecord) -> String {
    let mut line = format!("[{}] {}", record.level.as_str(), record.message);
    if let Some(ref kind) = record.kind {
        line.push_str(&format!(" ({})", kind));
    }
    let summary = fields_summary(record);
    if !summary.is_empty() {
        line.push(' ');
        line.push_str(&summary);
    }
    line
}

/// stderr へ出力する Log 実装
///
/// `min_level` より詳細なレコード（例: Info 指定時の Debug）は捨てる。
pub struct StderrLog {
    min_level: LogLevel,
    lock: Mutex<()>,
}

impl StderrLog {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            lock: Mutex::new(()),
        }
    }

    fn enabled(&self, level: LogLevel) -> bool {
        severity(level) <= severity(self.min_level)
    }
}

fn severity(level: LogLevel) -> u8 {
    match level {
        LogLevel::Error => 0,
        LogLevel::Warn => 1,
        LogLevel::Info => 2,
        LogLevel::Debug => 3,
    }
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if !self.enabled(record.level) {
            return Ok(());
        }
        let _guard = self.lock.lock().map_err(|_| Error::io_msg("stderr log lock poisoned"))?;
        let mut err = std::io::stderr().lock();
        writeln!(err, "{}", format_line(record))?;
        Ok(())
    }
}
