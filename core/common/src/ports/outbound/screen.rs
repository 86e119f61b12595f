//! 表示面 Outbound ポート（小型 OLED とステータス LED）
//!
//! ターン中に「待機中」「受信クエリのエコー」「short 回答」を順に出す。

use crate::error::Error;

/// ステータス表示（元の機器では緑 / 赤の LED）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// 入力待ち
    Idle,
    /// ターン処理中
    Busy,
}

/// 表示面（Outbound ポート）
///
/// 実装は common::adapter::TextScreen やテスト用の記録型など。
pub trait Screen: Send {
    /// 待機画面（"Listening..."）
    fn show_listening(&mut self) -> Result<(), Error>;
    /// 受信したクエリのエコー
    fn show_query(&mut self, query: &str) -> Result<(), Error>;
    /// short 回答
    fn show_answer(&mut self, short: &str) -> Result<(), Error>;
    fn set_activity(&mut self, activity: Activity) -> Result<(), Error>;
}
