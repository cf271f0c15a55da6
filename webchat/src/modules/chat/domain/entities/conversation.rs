use serde::{Deserialize, Serialize};

use super::Message;

/// 会话历史 - 按插入顺序排列的消息序列
///
/// 只追加，不修改也不删除；每次变更后整体持久化
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// 追加一条消息
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// 会话是否仍停留在欢迎语阶段：恰好一条消息且来自机器人。
    ///
    /// 恢复历史时据此决定是否显示快捷回复。
    pub fn is_fresh_welcome_state(&self) -> bool {
        matches!(self.messages.as_slice(), [only] if only.is_from_bot())
    }
}
