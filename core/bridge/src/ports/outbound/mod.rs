//! Outbound ポート: bridge 固有の外界依存（共通のものは common::ports::outbound）

pub mod interrupt_checker;

pub use interrupt_checker::InterruptChecker;
