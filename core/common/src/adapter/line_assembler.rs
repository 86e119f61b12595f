//! バイト列を改行で区切って行にする（シリアル / stdin 共通）

use std::collections::VecDeque;

/// 1 行の上限バイト数。改行が来ないまま超えたらそこで 1 行として切り出す。
pub const MAX_LINE_BYTES: usize = 4096;

/// 受信バイトを溜め、`\n` ごとに 1 行として取り出す
///
/// 行末の `\r` は除去する。UTF-8 として不正なバイトは置換文字になる。
/// 改行なしで MAX_LINE_BYTES に達した分は、その時点で 1 行として扱う。
#[derive(Debug, Default)]
pub struct LineAssembler {
    partial: Vec<u8>,
    ready: VecDeque<String>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                let mut line = std::mem::take(&mut self.partial);
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                self.ready
                    .push_back(String::from_utf8_lossy(&line).into_owned());
            } else {
                self.partial.push(b);
                if self.partial.len() >= MAX_LINE_BYTES {
                    let line = std::mem::take(&mut self.partial);
                    self.ready
                        .push_back(String::from_utf8_lossy(&line).into_owned());
                }
            }
        }
    }

    pub fn next_line(&mut self) -> Option<String> {
        self.ready.pop_front()
    }

    /// 改行が来ないまま閉じられたときの残り（空なら None）
    pub fn take_partial(&mut self) -> Option<String> {
        if self.partial.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.partial);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_across_feeds() {
        let mut a = LineAssembler::new();
        a.feed(b"what is ");
        assert_eq!(a.next_line(), None);
        a.feed(b"rust\r\nnext");
        assert_eq!(a.next_line().as_deref(), Some("what is rust"));
        assert_eq!(a.next_line(), None);
        assert_eq!(a.take_partial().as_deref(), Some("next"));
        assert_eq!(a.take_partial(), None);
    }

    #[test]
    fn test_multiple_lines_in_one_feed() {
        let mut a = LineAssembler::new();
        a.feed(b"a\n\nb\n");
        assert_eq!(a.next_line().as_deref(), Some("a"));
        assert_eq!(a.next_line().as_deref(), Some(""));
        assert_eq!(a.next_line().as_deref(), Some("b"));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut a = LineAssembler::new();
        a.feed(&[0x68, 0xff, 0x69, b'\n']);
        assert_eq!(a.next_line().as_deref(), Some("h\u{fffd}i"));
    }

    #[test]
    fn test_overlong_line_is_split_at_cap() {
        let mut a = LineAssembler::new();
        a.feed(&vec![b'x'; MAX_LINE_BYTES * 2 + 10]);
        assert_eq!(a.next_line().map(|l| l.len()), Some(MAX_LINE_BYTES));
        assert_eq!(a.next_line().map(|l| l.len()), Some(MAX_LINE_BYTES));
        assert_eq!(a.next_line(), None);
        a.feed(b"\n");
        assert_eq!(a.next_line().map(|l| l.len()), Some(10));
    }
}
