//! ユーザークエリのドメイン型（シリアル線から受けた 1 行）

/// 前後の空白を除いた、空でないクエリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    #[allow(dead_code)] // テストで使用
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 受信行からクエリを作る（空白のみの行は None）
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }
}

impl std::ops::Deref for Query {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
