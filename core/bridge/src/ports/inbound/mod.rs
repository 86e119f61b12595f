//! Inbound ポート: ドライバ（CLI）がアプリを呼び出すインターフェース

use common::error::Error;

/// ブリッジを起動して終了コードを返す Inbound ポート
///
/// main はこの trait を実装した型（wiring::App）の run を呼び出す。
pub trait RunBridge {
    fn run(&mut self) -> Result<i32, Error>;
}
