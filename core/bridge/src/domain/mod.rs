//! bridge 固有のドメイン型（型と不変条件）

pub mod channel;
pub mod query;

pub use channel::ChannelSpec;
pub use query::Query;
