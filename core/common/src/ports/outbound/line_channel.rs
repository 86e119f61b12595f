//! シリアル線 Outbound ポート
//!
//! 改行終端の UTF-8 行を 1 クエリとして受け取り、long 回答を 1 行で返す。

use crate::error::Error;

/// 1 回の読み取り結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// 改行まで届いた 1 行（改行・CR は除去済み）
    Line(String),
    /// 読み取りがタイムアウトした（行はまだ完成していない）
    Idle,
    /// 相手側が閉じた / EOF
    Closed,
}

/// 行単位の双方向チャネル（Outbound ポート）
///
/// 実装は common::adapter::SerialLineChannel（tty）、StdioLineChannel（stdin/stdout）など。
pub trait LineChannel: Send {
    fn read_line(&mut self) -> Result<LineEvent, Error>;
    /// 改行を付けて書き出し、flush する
    fn write_line(&mut self, line: &str) -> Result<(), Error>;
}
