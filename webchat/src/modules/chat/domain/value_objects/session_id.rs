use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 访客会话标识符
///
/// 对核心而言是不透明字符串：新生成的 ID 为 UUID v4，
/// 但从存储中读取的任意非空值都原样接受。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// 生成新的会话 ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// 从存储值恢复，空白字符串视为不存在
    pub fn from_stored(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
