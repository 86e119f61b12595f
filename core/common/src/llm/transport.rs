//! Chat Completions トランスポートのトレイト定義

use crate::error::Error;
use crate::llm::request::ChatRequest;

/// リクエストを 1 回だけ送り、生のレスポンス body を返す
///
/// 再試行はしない。接続失敗・タイムアウト・非 2xx は `Error::Transport`。
pub trait ChatTransport: Send + Sync {
    /// トランスポート名を返す（ログ用）
    fn name(&self) -> &str;

    /// # Returns
    /// * `Ok(String)` - レスポンス body（解釈はデコーダの責務）
    /// * `Err(Error)` - `Error::Transport`
    fn send(&self, request: &ChatRequest) -> Result<String, Error>;
}
