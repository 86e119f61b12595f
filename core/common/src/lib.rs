//! Pixie ブリッジ共通ライブラリ
//!
//! シリアル線から受けたクエリを Chat Completions API に送り、
//! 2 段デコードした回答（long / short）を返すための部品を提供します。

/// ドメイン型
pub mod domain;

/// エラーハンドリング
pub mod error;

/// 固定容量の会話履歴
pub mod history;

/// リクエスト組み立て・トランスポート・デコード
pub mod llm;

/// Ports & Adapters のポート定義
pub mod ports;

/// 標準アダプタ
pub mod adapter;
