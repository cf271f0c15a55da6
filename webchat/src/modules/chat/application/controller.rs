// Chat Session Controller
//
// 聊天会话控制器：初始化、发送、接收以及失败替换。
// 发送通过单一队列串行执行，每条用户消息后紧跟它的机器人回复。

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::services::{ConversationStore, SessionIdentityProvider};
use crate::infrastructure::EventBus;
use crate::modules::chat::domain::{
    create_apology_message, create_message, create_reply_message, create_welcome_message,
    ChatDomainEvent, Conversation, Message, Sender, SessionId,
};
use crate::modules::chat::ports::{KeyValueStore, WebhookPort, WebhookRequest};

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChatStatus {
    /// 尚未完成首次加载
    AwaitingWelcome,
    Idle,
    /// 有发送在排队或进行中（显示“输入中”）
    SendingMessage,
}

/// 提供给渲染层的状态快照
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    pub session_id: SessionId,
    pub messages: Vec<Message>,
    pub is_typing: bool,
    pub show_quick_replies: bool,
    pub status: ChatStatus,
}

/// 一次发送的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// 远端成功响应，附带追加的机器人消息
    Delivered(Message),
    /// 发送失败，附带追加的道歉消息
    Failed(Message),
}

impl SendOutcome {
    pub fn message(&self) -> &Message {
        match self {
            SendOutcome::Delivered(message) | SendOutcome::Failed(message) => message,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered(_))
    }
}

#[derive(Debug, Default)]
struct SessionState {
    conversation: Conversation,
    show_quick_replies: bool,
    initialized: bool,
}

/// 发送进行中标记
///
/// 在用户消息追加并落盘之后创建，计数加一；析构时减一，计数归零时发布 typing=false。
/// 无论发送以何种方式结束（包括任务被取消），标记都会被清除。
struct SendingGuard {
    in_flight: Arc<AtomicUsize>,
    events: Arc<EventBus>,
    session_id: SessionId,
}

impl SendingGuard {
    fn begin(in_flight: Arc<AtomicUsize>, events: Arc<EventBus>, session_id: SessionId) -> Self {
        if in_flight.fetch_add(1, Ordering::SeqCst) == 0 {
            events.publish(ChatDomainEvent::typing_changed(session_id.clone(), true));
        }
        Self {
            in_flight,
            events,
            session_id,
        }
    }
}

impl Drop for SendingGuard {
    fn drop(&mut self) {
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.events.publish(ChatDomainEvent::typing_changed(
                self.session_id.clone(),
                false,
            ));
        }
    }
}

/// 聊天会话控制器
pub struct ChatSessionController {
    identity: SessionIdentityProvider,
    store: ConversationStore,
    webhook: Arc<dyn WebhookPort>,
    events: Arc<EventBus>,
    state: RwLock<SessionState>,
    in_flight: Arc<AtomicUsize>,
    send_queue: Mutex<()>,
}

impl ChatSessionController {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        webhook: Arc<dyn WebhookPort>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            identity: SessionIdentityProvider::new(store.clone()),
            store: ConversationStore::new(store),
            webhook,
            events,
            state: RwLock::new(SessionState::default()),
            in_flight: Arc::new(AtomicUsize::new(0)),
            send_queue: Mutex::new(()),
        }
    }

    /// 初始化会话：恢复历史，或注入欢迎语并立即持久化
    ///
    /// 只在第一次调用时生效，之后直接返回当前快照
    pub async fn initialize(&self) -> ChatSnapshot {
        let session_id = self.identity.get_or_create_session_id().await;

        {
            let mut state = self.state.write().await;
            if !state.initialized {
                let stored = self.store.load_messages().await;
                let restored = !stored.is_empty();

                if restored {
                    state.conversation = Conversation::from_messages(stored);
                    state.show_quick_replies = state.conversation.is_fresh_welcome_state();
                } else {
                    let welcome = create_welcome_message();
                    state.conversation = Conversation::from_messages(vec![welcome]);
                    self.store
                        .save_messages(state.conversation.messages())
                        .await;
                    state.show_quick_replies = true;
                }
                state.initialized = true;

                tracing::info!(
                    "Conversation {} for session {} ({} messages)",
                    if restored { "restored" } else { "started" },
                    session_id,
                    state.conversation.len()
                );

                self.events.publish(ChatDomainEvent::conversation_initialized(
                    session_id.clone(),
                    restored,
                    state.conversation.len(),
                ));
                self.events.publish(ChatDomainEvent::quick_replies_changed(
                    session_id,
                    state.show_quick_replies,
                ));
            }
        }

        self.snapshot().await
    }

    /// 发送消息并等待远端回复
    ///
    /// 从不返回错误：失败时追加道歉消息并返回 `SendOutcome::Failed`
    pub async fn send_message(&self, text: impl Into<String>) -> SendOutcome {
        let text = text.into();
        self.ensure_initialized().await;

        let session_id = self.identity.get_or_create_session_id().await;
        let _turn = self.send_queue.lock().await;

        let user_message = create_message(text.clone(), Sender::User);
        self.append_message(&session_id, user_message).await;
        self.set_quick_replies(&session_id, false).await;
        let _sending =
            SendingGuard::begin(self.in_flight.clone(), self.events.clone(), session_id.clone());

        let request = WebhookRequest::new(&session_id, text);
        match self.webhook.deliver(request).await {
            Ok(reply) => {
                let bot_message = create_reply_message(reply.text.as_deref());
                self.append_message(&session_id, bot_message.clone()).await;
                if reply.has_quick_replies {
                    self.set_quick_replies(&session_id, true).await;
                }
                SendOutcome::Delivered(bot_message)
            }
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                let apology = create_apology_message();
                self.append_message(&session_id, apology.clone()).await;
                SendOutcome::Failed(apology)
            }
        }
    }

    /// 在后台任务中发送，调用方可通过事件总线观察完成
    pub fn spawn_send_message(self: &Arc<Self>, text: impl Into<String>) -> JoinHandle<SendOutcome> {
        let controller = Arc::clone(self);
        let text = text.into();
        tokio::spawn(async move { controller.send_message(text).await })
    }

    /// 快捷回复：与直接发送相同
    pub async fn handle_quick_reply(&self, text: impl Into<String>) -> SendOutcome {
        self.send_message(text).await
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> ChatSnapshot {
        let session_id = self.identity.get_or_create_session_id().await;
        let state = self.state.read().await;
        let is_typing = self.in_flight.load(Ordering::SeqCst) > 0;

        let status = if !state.initialized {
            ChatStatus::AwaitingWelcome
        } else if is_typing {
            ChatStatus::SendingMessage
        } else {
            ChatStatus::Idle
        };

        ChatSnapshot {
            session_id,
            messages: state.conversation.messages().to_vec(),
            is_typing,
            show_quick_replies: state.show_quick_replies,
            status,
        }
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChatDomainEvent> {
        self.events.subscribe()
    }

    async fn ensure_initialized(&self) {
        if !self.state.read().await.initialized {
            self.initialize().await;
        }
    }

    /// 追加并立即整体持久化，两步在同一把写锁内完成
    async fn append_message(&self, session_id: &SessionId, message: Message) {
        let mut state = self.state.write().await;
        state.conversation.append(message.clone());
        self.store.save_messages(state.conversation.messages()).await;
        drop(state);

        self.events
            .publish(ChatDomainEvent::message_appended(session_id.clone(), message));
    }

    async fn set_quick_replies(&self, session_id: &SessionId, visible: bool) {
        let mut state = self.state.write().await;
        if state.show_quick_replies != visible {
            state.show_quick_replies = visible;
            drop(state);
            self.events.publish(ChatDomainEvent::quick_replies_changed(
                session_id.clone(),
                visible,
            ));
        }
    }
}
