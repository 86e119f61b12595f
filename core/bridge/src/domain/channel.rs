//! クエリを受ける経路の設定

use common::domain::DevicePath;

/// シリアルデバイスか stdin/stdout か
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSpec {
    Serial { device: DevicePath, baud: u32 },
    Stdio,
}

impl ChannelSpec {
    /// ログ用の短い表記
    pub fn describe(&self) -> String {
        match self {
            ChannelSpec::Serial { device, baud } => format!("{}@{}", device, baud),
            ChannelSpec::Stdio => "stdio".to_string(),
        }
    }
}
