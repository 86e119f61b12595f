//! 応答の 2 段デコード
//!
//! 1. envelope: `choices[0].message.content` の文字列を取り出す
//! 2. content: その文字列自体を JSON として読み、`long` / `short` を取り出す
//!
//! どちらも失敗は Err で返し、途中結果は返さない。

use crate::domain::AnswerPair;
use crate::error::Error;
use serde_json::Value;

/// 2 段とも成功したときの結果
///
/// `content` は 1 段目で取り出した生テキスト（履歴にはこちらを積む）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAnswer {
    pub answer: AnswerPair,
    pub content: String,
}

/// 1 段目: レスポンス body から assistant の content 文字列を取り出す
pub fn decode_envelope(raw: &str) -> Result<String, Error> {
    let v: Value = serde_json::from_str(raw)
        .map_err(|e| Error::envelope(format!("Failed to parse response JSON: {}", e)))?;

    match &v["choices"][0]["message"]["content"] {
        Value::String(s) => Ok(s.clone()),
        // content が無く error オブジェクトがあれば API のメッセージを出す
        Value::Null if v["error"].is_object() => {
            let msg = v["error"]["message"].as_str().unwrap_or("Unknown error");
            Err(Error::envelope(format!("API error: {}", msg)))
        }
        Value::Null => Err(Error::envelope(
            "choices[0].message.content is missing",
        )),
        other => Err(Error::envelope(format!(
            "choices[0].message.content is not a string: {}",
            json_type_name(other)
        ))),
    }
}

/// 2 段目: content 文字列から long / short を取り出す
pub fn decode_content(text: &str) -> Result<AnswerPair, Error> {
    let v: Value = serde_json::from_str(text)
        .map_err(|e| Error::content(format!("Failed to parse content JSON: {}", e)))?;
    if !v.is_object() {
        return Err(Error::content(format!(
            "content is not a JSON object: {}",
            json_type_name(&v)
        )));
    }
    let long = string_field(&v, "long")?;
    let short = string_field(&v, "short")?;
    Ok(AnswerPair { long, short })
}

/// 2 段を直列に実行する（1 段目で失敗したら 2 段目は試さない）
pub fn decode_response(raw: &str) -> Result<DecodedAnswer, Error> {
    let content = decode_envelope(raw)?;
    let answer = decode_content(&content)?;
    Ok(DecodedAnswer { answer, content })
}

fn string_field(v: &Value, name: &str) -> Result<String, Error> {
    match v.get(name) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::content(format!(
            "field '{}' is not a string: {}",
            name,
            json_type_name(other)
        ))),
        None => Err(Error::content(format!("field '{}' is missing", name))),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
