//! Chat Completions パイプライン
//!
//! リクエスト組み立て → トランスポート → 2 段デコード。

pub mod decode;
pub mod echo;
pub mod factory;
pub mod message;
pub mod openai_compat;
pub mod request;
pub mod transport;

pub use decode::{decode_content, decode_envelope, decode_response, DecodedAnswer};
pub use factory::{create_transport, AnyTransport, TransportType};
pub use message::{Message, Role};
pub use request::{build_request, ChatRequest, ModelSettings, SYSTEM_INSTRUCTION};
pub use transport::ChatTransport;
