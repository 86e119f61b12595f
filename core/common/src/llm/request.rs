//! Chat Completions リクエストの組み立て
//!
//! system 指示 → 履歴（挿入順そのまま）→ 今回のクエリ、の順でメッセージ列を作る。

use crate::history::HistoryBuffer;
use crate::llm::message::Message;
use serde::Serialize;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// 応答形式（long / short のフラットな JSON）をモデルに指示する system メッセージ
pub const SYSTEM_INSTRUCTION: &str = "You are a Home Assistant AI. Provide responses in JSON format with two fields: 'long' for detailed answers and 'short' for brief answers suitable for display on a small screen (0.96 inch OLED). These fields cannot be nested and need to contain a single string. This is an example response for query 'Speed of light': {\"long\": \"The speed of light is 299792458 meter per second\", \"short\": \"299792458 m/s\"}";

/// モデル名と応答長の上限
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    pub model: String,
    pub max_tokens: u32,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// 1 クエリごとに作り捨てるリクエスト（シリアライズ結果がそのまま POST の body）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

impl ChatRequest {
    /// 末尾の user メッセージ（今回のクエリ）
    pub fn query(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content())
    }

    pub fn to_json(&self) -> Result<String, crate::error::Error> {
        serde_json::to_string(self)
            .map_err(|e| crate::error::Error::transport(format!("Failed to serialize request: {}", e)))
    }
}

/// 履歴のスナップショットとクエリからリクエストを作る
///
/// クエリの空判定・長さ制限は呼び出し側の責務。
pub fn build_request(
    settings: &ModelSettings,
    system_instruction: &str,
    history: &HistoryBuffer,
    query: &str,
) -> ChatRequest {
    let mut messages = Vec::with_capacity(history.size() + 2);
    messages.push(Message::system(system_instruction));
    messages.extend(history.iter().cloned());
    messages.push(Message::user(query));
    ChatRequest {
        model: settings.model.clone(),
        max_tokens: settings.max_tokens,
        messages,
    }
}
