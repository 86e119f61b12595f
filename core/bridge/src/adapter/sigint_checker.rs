//! Ctrl+C（SIGINT）による停止要求の InterruptChecker 実装
//!
//! 1 回目の Ctrl+C はターンの合間で serve を抜ける要求になる（送信中のターンは最後まで待つ）。
//! ターンは最大でタイムアウト + 表示保持時間ブロックするので、2 回目で即時終了する。

use crate::ports::outbound::InterruptChecker;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// SIGINT で即時終了したときの終了コード（128 + SIGINT）
pub const FORCED_EXIT_CODE: i32 = 130;

/// Ctrl+C が押されたときの対応
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// 現在のターンの後で止める
    StopAfterTurn,
    /// 待たずに終了する
    ExitNow,
}

/// Ctrl+C の押下回数
#[derive(Debug, Default)]
pub struct StopRequest {
    presses: AtomicUsize,
}

impl StopRequest {
    pub fn press(&self) -> PressOutcome {
        match self.presses.fetch_add(1, Ordering::SeqCst) {
            0 => PressOutcome::StopAfterTurn,
            _ => PressOutcome::ExitNow,
        }
    }

    pub fn is_requested(&self) -> bool {
        self.presses.load(Ordering::SeqCst) > 0
    }
}

/// ctrlc ハンドラで StopRequest を更新する実装
pub struct SigintChecker {
    request: Arc<StopRequest>,
}

impl SigintChecker {
    /// SIGINT ハンドラを登録する（プロセスで 1 回だけ成功する）
    pub fn new() -> Result<Self, ctrlc::Error> {
        let request = Arc::new(StopRequest::default());
        let in_handler = Arc::clone(&request);
        ctrlc::set_handler(move || match in_handler.press() {
            PressOutcome::StopAfterTurn => {
                eprintln!("bridge: stopping after the current turn (Ctrl+C again to quit now)");
            }
            PressOutcome::ExitNow => std::process::exit(FORCED_EXIT_CODE),
        })?;
        Ok(Self { request })
    }
}

impl InterruptChecker for SigintChecker {
    fn is_interrupted(&self) -> bool {
        self.request.is_requested()
    }
}

/// 停止を検知しないスタブ（stdin モードやハンドラ登録に失敗した場合に使用）
pub struct NoopInterruptChecker;

impl InterruptChecker for NoopInterruptChecker {
    fn is_interrupted(&self) -> bool {
        false
    }
}
