//! Ctrl+C（SIGINT）等による停止要求を検知する Outbound ポート
//!
//! ポーリングループは行の読み取りごとにこの trait を参照し、true ならターンの合間で抜ける。

/// 停止が要求されたかどうかを返す能力
pub trait InterruptChecker: Send + Sync {
    fn is_interrupted(&self) -> bool;
}
