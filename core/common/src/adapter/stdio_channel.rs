//! 任意の Read / Write 上の LineChannel 実装（既定は stdin / stdout）
//!
//! ベンチ確認用。読み取りはブロッキングで、Idle は返さない。

use super::line_assembler::LineAssembler;
use crate::error::Error;
use crate::ports::outbound::{LineChannel, LineEvent};
use std::io::{self, Read, Stdin, Stdout, Write};

pub struct StdioLineChannel<R, W> {
    reader: R,
    writer: W,
    assembler: LineAssembler,
    closed: bool,
}

impl StdioLineChannel<Stdin, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin(), io::stdout())
    }
}

impl<R: Read + Send, W: Write + Send> StdioLineChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            assembler: LineAssembler::new(),
            closed: false,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: Read + Send, W: Write + Send> LineChannel for StdioLineChannel<R, W> {
    fn read_line(&mut self) -> Result<LineEvent, Error> {
        let mut buf = [0u8; 256];
        loop {
            if let Some(line) = self.assembler.next_line() {
                return Ok(LineEvent::Line(line));
            }
            if self.closed {
                return Ok(LineEvent::Closed);
            }
            let n = match self.reader.read(&mut buf) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from(e)),
            };
            if n == 0 {
                self.closed = true;
                if let Some(line) = self.assembler.take_partial() {
                    return Ok(LineEvent::Line(line));
                }
                continue;
            }
            self.assembler.feed(&buf[..n]);
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), Error> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
