//! 環境変数解決 Outbound ポート
//!
//! 設定ファイルの場所と API キーを環境変数から解決する。
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. PIXIE_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/pixie（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/pixie
    fn resolve_home_dir(&self) -> Result<PathBuf, Error>;

    /// 既定の設定ファイルパス（resolve_home_dir() 直下の config.json）
    fn resolve_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("config.json"))
    }

    /// 名前で環境変数を読む（未設定・空文字は None）
    fn var(&self, name: &str) -> Option<String>;
}
