use std::sync::Arc;

use crate::modules::chat::domain::Message;
use crate::modules::chat::ports::KeyValueStore;

/// 会话历史在存储中的键
pub const MESSAGES_KEY: &str = "criemos_chat_messages";

/// 会话历史存储
///
/// 以 JSON 数组整体读写；损坏或读取失败一律视为没有历史
pub struct ConversationStore {
    store: Arc<dyn KeyValueStore>,
}

impl ConversationStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// 加载已持久化的会话历史
    pub async fn load_messages(&self) -> Vec<Message> {
        let raw = match self.store.get(MESSAGES_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read conversation, starting empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Stored conversation is corrupt, ignoring it: {}", e);
                Vec::new()
            }
        }
    }

    /// 覆盖写入完整会话历史，失败时只记录日志
    pub async fn save_messages(&self, messages: &[Message]) {
        let raw = match serde_json::to_string(messages) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialize conversation: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(MESSAGES_KEY, raw).await {
            tracing::warn!(
                "Failed to persist conversation ({} messages): {}",
                messages.len(),
                e
            );
        }
    }
}
