//! OpenAI Chat Completions 互換 (/chat/completions) トランスポート
//!
//! base_url で任意のエンドポイントを指定可能。blocking クライアントで 1 回だけ POST する。

use crate::error::Error;
use crate::llm::request::ChatRequest;
use crate::llm::transport::ChatTransport;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// OpenAI Chat Completions 互換トランスポート
pub struct OpenAiCompatTransport {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl OpenAiCompatTransport {
    /// 新しいトランスポートを作成
    ///
    /// * `base_url` - ベース URL（None のとき DEFAULT_BASE_URL）
    /// * `api_key` - Bearer 認証のキー（None のとき Authorization を付けない）
    /// * `timeout` - 応答待ちの上限（接続から body 読み終わりまで）
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn auth_header(&self) -> Option<String> {
        self.api_key.as_ref().map(|key| format!("Bearer {}", key))
    }
}

impl ChatTransport for OpenAiCompatTransport {
    fn name(&self) -> &str {
        "openai"
    }

    fn send(&self, request: &ChatRequest) -> Result<String, Error> {
        let body = request.to_json()?;
        let mut builder = self
            .client
            .post(self.url())
            .header("Content-Type", "application/json")
            .body(body);

        if let Some(auth) = self.auth_header() {
            builder = builder.header("Authorization", auth);
        }

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("HTTP request timed out: {}", e))
            } else {
                Error::transport(format!("HTTP request failed: {}", e))
            }
        })?;

        let status = response.status();
        let response_text = response
            .text()
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let error_msg = if let Ok(v) = serde_json::from_str::<Value>(&response_text) {
                v["error"]["message"]
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| format!("HTTP {}: {}", status, response_text))
            } else {
                format!("HTTP {}: {}", status, response_text)
            };
            return Err(Error::transport(format!("Chat completions error: {}", error_msg)));
        }

        Ok(response_text)
    }
}
