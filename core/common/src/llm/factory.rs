//! トランスポートファクトリー
//!
//! トランスポート種別に基づいて適切な ChatTransport を作成します。

use crate::error::Error;
use crate::llm::echo::EchoTransport;
use crate::llm::openai_compat::OpenAiCompatTransport;
use crate::llm::request::ChatRequest;
use crate::llm::transport::ChatTransport;
use std::time::Duration;

/// トランスポート種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    /// OpenAI Chat Completions 互換 (/chat/completions)
    OpenAi,
    /// Echo（ネットワークを使わない）
    Echo,
}

impl TransportType {
    /// 文字列から種別を解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "openai_compat" | "gpt" => Some(Self::OpenAi),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Echo => "echo",
        }
    }
}

/// トランスポートの enum ラッパー
pub enum AnyTransport {
    OpenAi(OpenAiCompatTransport),
    Echo(EchoTransport),
}

impl ChatTransport for AnyTransport {
    fn name(&self) -> &str {
        match self {
            Self::OpenAi(t) => t.name(),
            Self::Echo(t) => t.name(),
        }
    }

    fn send(&self, request: &ChatRequest) -> Result<String, Error> {
        match self {
            Self::OpenAi(t) => t.send(request),
            Self::Echo(t) => t.send(request),
        }
    }
}

/// トランスポートを作成
///
/// * `api_key` - OpenAi のとき必須（Echo では無視）
pub fn create_transport(
    transport_type: TransportType,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
) -> Result<AnyTransport, Error> {
    match transport_type {
        TransportType::OpenAi => {
            if api_key.is_none() {
                return Err(Error::env("API key is not set"));
            }
            Ok(AnyTransport::OpenAi(OpenAiCompatTransport::new(
                base_url, api_key, timeout,
            )?))
        }
        TransportType::Echo => Ok(AnyTransport::Echo(EchoTransport::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_type_from_str() {
        assert_eq!(TransportType::from_str("OpenAI"), Some(TransportType::OpenAi));
        assert_eq!(TransportType::from_str("echo"), Some(TransportType::Echo));
        assert_eq!(TransportType::from_str("gemini"), None);
    }

    #[test]
    fn test_openai_requires_key() {
        let r = create_transport(TransportType::OpenAi, None, None, Duration::from_secs(1));
        assert!(matches!(r, Err(Error::Env(_))));
    }

    #[test]
    fn test_echo_needs_no_key() {
        let t = create_transport(TransportType::Echo, None, None, Duration::from_secs(1)).unwrap();
        assert_eq!(t.name(), "echo");
    }
}
