use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entities::Message;
use super::value_objects::SessionId;

/// 领域事件基础 trait
pub trait DomainEvent: Clone + Send + Sync {
    fn event_type(&self) -> &'static str;
    fn timestamp(&self) -> DateTime<Utc>;
}

/// 会话初始化完成事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationInitializedEvent {
    pub session_id: SessionId,
    /// 是否从存储中恢复（否则注入了欢迎语）
    pub restored: bool,
    pub message_count: usize,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for ConversationInitializedEvent {
    fn event_type(&self) -> &'static str {
        "conversation.initialized"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 消息追加事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAppendedEvent {
    pub session_id: SessionId,
    pub message: Message,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for MessageAppendedEvent {
    fn event_type(&self) -> &'static str {
        "message.appended"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 输入中指示器变化事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingChangedEvent {
    pub session_id: SessionId,
    pub is_typing: bool,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for TypingChangedEvent {
    fn event_type(&self) -> &'static str {
        "typing.changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 快捷回复显示状态变化事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickRepliesChangedEvent {
    pub session_id: SessionId,
    pub visible: bool,
    pub timestamp: DateTime<Utc>,
}

impl DomainEvent for QuickRepliesChangedEvent {
    fn event_type(&self) -> &'static str {
        "quick_replies.changed"
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 聊天领域事件枚举
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChatDomainEvent {
    ConversationInitialized(ConversationInitializedEvent),
    MessageAppended(MessageAppendedEvent),
    TypingChanged(TypingChangedEvent),
    QuickRepliesChanged(QuickRepliesChangedEvent),
}

impl ChatDomainEvent {
    pub fn conversation_initialized(
        session_id: SessionId,
        restored: bool,
        message_count: usize,
    ) -> Self {
        Self::ConversationInitialized(ConversationInitializedEvent {
            session_id,
            restored,
            message_count,
            timestamp: Utc::now(),
        })
    }

    pub fn message_appended(session_id: SessionId, message: Message) -> Self {
        Self::MessageAppended(MessageAppendedEvent {
            session_id,
            message,
            timestamp: Utc::now(),
        })
    }

    pub fn typing_changed(session_id: SessionId, is_typing: bool) -> Self {
        Self::TypingChanged(TypingChangedEvent {
            session_id,
            is_typing,
            timestamp: Utc::now(),
        })
    }

    pub fn quick_replies_changed(session_id: SessionId, visible: bool) -> Self {
        Self::QuickRepliesChanged(QuickRepliesChangedEvent {
            session_id,
            visible,
            timestamp: Utc::now(),
        })
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            ChatDomainEvent::ConversationInitialized(e) => e.event_type(),
            ChatDomainEvent::MessageAppended(e) => e.event_type(),
            ChatDomainEvent::TypingChanged(e) => e.event_type(),
            ChatDomainEvent::QuickRepliesChanged(e) => e.event_type(),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ChatDomainEvent::ConversationInitialized(e) => e.timestamp(),
            ChatDomainEvent::MessageAppended(e) => e.timestamp(),
            ChatDomainEvent::TypingChanged(e) => e.timestamp(),
            ChatDomainEvent::QuickRepliesChanged(e) => e.timestamp(),
        }
    }
}
