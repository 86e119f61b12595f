//! 待機 Outbound ポート（回答表示の保持時間など）

use std::time::Duration;

/// 指定時間ブロックする能力
///
/// 実装は `common::adapter::StdSleeper` やテスト用の記録型など。
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}
