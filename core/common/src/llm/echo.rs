//! Echo トランスポートの実装
//!
//! 実際の API は呼ばず、クエリをそのまま long / short に入れた envelope を返す。
//! API キーなしでの配線確認やベンチテスト用。

use crate::error::Error;
use crate::llm::request::ChatRequest;
use crate::llm::transport::ChatTransport;
use serde_json::json;

/// short に入れる最大文字数（OLED 1 行分）
pub const ECHO_SHORT_CHARS: usize = 21;

/// Echo トランスポート
#[derive(Debug, Clone, Default)]
pub struct EchoTransport;

impl EchoTransport {
    pub fn new() -> Self {
        Self
    }
}

impl ChatTransport for EchoTransport {
    fn name(&self) -> &str {
        "echo"
    }

    fn send(&self, request: &ChatRequest) -> Result<String, Error> {
        let query = request.query().unwrap_or("");
        let short: String = query.chars().take(ECHO_SHORT_CHARS).collect();
        let content = json!({ "long": query, "short": short }).to_string();
        Ok(json!({
            "object": "chat.completion",
            "model": request.model,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })
        .to_string())
    }
}
