use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::value_objects::{MessageId, Sender};

/// 消息实体
///
/// 创建后不可变，只会被追加到会话末尾
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    sender: Sender,
    text: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    /// 由各个字段组装消息（工厂和存储恢复使用）
    pub fn from_parts(
        id: MessageId,
        sender: Sender,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
            timestamp,
        }
    }

    // Getters
    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_from_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}
