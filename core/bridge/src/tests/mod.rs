//! ユースケースのテスト（スタブのトランスポート・記録用の画面とチャネルで実行）

mod support;
mod turn_tests;
