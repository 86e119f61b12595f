//! 標準の待機実装（thread::sleep を委譲）

use crate::ports::outbound::Sleeper;
use std::time::Duration;

/// std::thread::sleep を使う Sleeper 実装
#[derive(Debug, Clone, Default)]
pub struct StdSleeper;

impl Sleeper for StdSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
