//! 128x64 OLED を文字枠として描く Screen 実装
//!
//! 8px フォント想定で 21 桁 x 6 行。はみ出した分は切り捨てる。

use crate::error::Error;
use crate::ports::outbound::{Activity, Screen};
use std::io::{self, Stderr, Write};

pub const SCREEN_COLUMNS: usize = 21;
pub const SCREEN_ROWS: usize = 6;
pub const LISTENING_TEXT: &str = "Listening...";
pub const QUERY_PREFIX: &str = "Request: ";

/// テキストを幅 `columns` で折り返し、最大 `rows` 行にする
///
/// 単語単位で折り返し、1 語が幅を超える場合は文字単位で切る。
pub fn wrap_text(text: &str, columns: usize, rows: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = current.chars().count();
            let sep = if used == 0 { 0 } else { 1 };
            if used + sep + word.len() <= columns {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut current));
                continue;
            }
            // 空行に収まらない長い語は幅で切る
            let rest = word.split_off(columns);
            lines.push(word.iter().collect());
            word = rest;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.truncate(rows);
    lines
}

/// Write 先へ枠付きで描画する Screen
pub struct TextScreen<W> {
    out: W,
    columns: usize,
    rows: usize,
}

impl TextScreen<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> TextScreen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            columns: SCREEN_COLUMNS,
            rows: SCREEN_ROWS,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, text: &str) -> Result<(), Error> {
        let border = format!("+{}+", "-".repeat(self.columns));
        let mut lines = wrap_text(text, self.columns, self.rows);
        lines.resize(self.rows, String::new());
        let mut frame = String::new();
        frame.push_str(&border);
        frame.push('\n');
        for line in &lines {
            let pad = self.columns - line.chars().count();
            frame.push_str(&format!("|{}{}|\n", line, " ".repeat(pad)));
        }
        frame.push_str(&border);
        frame.push('\n');
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> Screen for TextScreen<W> {
    fn show_listening(&mut self) -> Result<(), Error> {
        self.draw(LISTENING_TEXT)
    }

    fn show_query(&mut self, query: &str) -> Result<(), Error> {
        self.draw(&format!("{}{}", QUERY_PREFIX, query))
    }

    fn show_answer(&mut self, short: &str) -> Result<(), Error> {
        self.draw(short)
    }

    fn set_activity(&mut self, activity: Activity) -> Result<(), Error> {
        let led = match activity {
            Activity::Idle => "[led] green",
            Activity::Busy => "[led] red",
        };
        writeln!(self.out, "{}", led)?;
        self.out.flush()?;
        Ok(())
    }
}
