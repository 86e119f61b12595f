//! tty デバイス上の LineChannel 実装（raw モード + ボーレート設定）
//!
//! 読み取りは VMIN=0 / VTIME で最大 READ_TIMEOUT_DECISEC だけ待ち、
//! 何も来なければ `LineEvent::Idle` を返す（呼び出し側のポーリング用）。

use super::line_assembler::LineAssembler;
use crate::domain::DevicePath;
use crate::error::Error;
use crate::ports::outbound::{LineChannel, LineEvent};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

pub const DEFAULT_BAUD: u32 = 115_200;
/// 1 回の read の待ち時間（0.1 秒単位）
const READ_TIMEOUT_DECISEC: u8 = 10;

/// 対応しているボーレートを termios の定数に変換する
pub fn baud_constant(baud: u32) -> Option<libc::speed_t> {
    let speed = match baud {
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        _ => return None,
    };
    Some(speed)
}

/// tty を raw モードにしている間の状態（Drop で元に戻す）
struct TermGuard {
    fd: i32,
    saved: libc::termios,
}

impl TermGuard {
    fn configure(fd: i32, speed: libc::speed_t) -> io::Result<Self> {
        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut termios) < 0 {
                return Err(io::Error::last_os_error());
            }
            let saved = termios;

            libc::cfmakeraw(&mut termios);
            termios.c_cflag |= libc::CLOCAL | libc::CREAD;
            termios.c_cc[libc::VMIN] = 0;
            termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECISEC;
            if libc::cfsetispeed(&mut termios, speed) < 0
                || libc::cfsetospeed(&mut termios, speed) < 0
            {
                return Err(io::Error::last_os_error());
            }
            if libc::tcsetattr(fd, libc::TCSANOW, &termios) < 0 {
                return Err(io::Error::last_os_error());
            }
            libc::tcflush(fd, libc::TCIFLUSH);
            Ok(TermGuard { fd, saved })
        }
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved);
        }
    }
}

/// シリアルデバイスの LineChannel
///
/// tty でないパス（FIFO 等）も開ける。その場合 termios は触らず、read が 0 なら Closed。
pub struct SerialLineChannel {
    // guard は file より先に drop させる（fd が有効なうちに termios を戻す）
    guard: Option<TermGuard>,
    file: File,
    assembler: LineAssembler,
    closed: bool,
}

impl SerialLineChannel {
    pub fn open(device: &DevicePath, baud: u32) -> Result<Self, Error> {
        let speed = baud_constant(baud)
            .ok_or_else(|| Error::config(format!("Unsupported baud rate: {}", baud)))?;
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(device.as_path())
            .map_err(|e| Error::io_msg(format!("Failed to open {}: {}", device, e)))?;
        let fd = file.as_raw_fd();
        let guard = if unsafe { libc::isatty(fd) } == 1 {
            Some(
                TermGuard::configure(fd, speed)
                    .map_err(|e| Error::io_msg(format!("Failed to configure {}: {}", device, e)))?,
            )
        } else {
            None
        };
        Ok(Self {
            guard,
            file,
            assembler: LineAssembler::new(),
            closed: false,
        })
    }

    pub fn is_tty(&self) -> bool {
        self.guard.is_some()
    }
}

impl LineChannel for SerialLineChannel {
    fn read_line(&mut self) -> Result<LineEvent, Error> {
        if let Some(line) = self.assembler.next_line() {
            return Ok(LineEvent::Line(line));
        }
        if self.closed {
            return Ok(LineEvent::Closed);
        }
        let mut buf = [0u8; 256];
        let n = match self.file.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(LineEvent::Idle),
            Err(e) => return Err(Error::from(e)),
        };
        if n == 0 {
            if self.is_tty() {
                return Ok(LineEvent::Idle);
            }
            self.closed = true;
            return Ok(match self.assembler.take_partial() {
                Some(line) => LineEvent::Line(line),
                None => LineEvent::Closed,
            });
        }
        self.assembler.feed(&buf[..n]);
        Ok(match self.assembler.next_line() {
            Some(line) => LineEvent::Line(line),
            None => LineEvent::Idle,
        })
    }

    fn write_line(&mut self, line: &str) -> Result<(), Error> {
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        Ok(())
    }
}
