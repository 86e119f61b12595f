//! 固定容量の会話履歴（スライディングウィンドウ）
//!
//! 容量を超える push は先頭（最古）を捨ててから末尾に追加する。
//! 領域は生成時に確保し、以降のターンで再確保しない。

use crate::error::Error;
use crate::llm::message::Message;
use std::collections::VecDeque;

/// 履歴の既定容量（user/assistant 10 往復分）
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// 直近 N 件のメッセージを挿入順に保持するバッファ
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    entries: VecDeque<Message>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
            capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// 容量 0 は履歴として意味を持たないので拒否する
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::invalid_argument("history capacity must be at least 1"));
        }
        Ok(Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// 末尾に追加。満杯なら先に最古を捨てる。
    pub fn push(&mut self, message: Message) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    /// 1 ターン分（user → assistant の順）を追加する
    pub fn push_turn(&mut self, query: impl Into<String>, assistant_content: impl Into<String>) {
        self.push(Message::user(query));
        self.push(Message::assistant(assistant_content));
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 挿入順で i 番目（0 が最古）
    pub fn at(&self, i: usize) -> Option<&Message> {
        self.entries.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        self.entries.iter()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
