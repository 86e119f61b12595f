//! ユースケース層

pub mod turn;

pub use turn::{ServeSummary, TurnDeps, TurnSettings, TurnUseCase};
