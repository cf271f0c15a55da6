// Chat Module - 聊天模块
//
// 实现六边形架构（Hexagonal Architecture）：
// - domain: 领域层，包含消息、会话历史、消息工厂和领域事件
// - ports: 端口层，键值存储与远端 webhook 的抽象接口
// - infrastructure: 基础设施层，文件/内存存储和 HTTP webhook 适配器
// - application: 应用层，会话身份、历史存储和会话控制器

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// 重新导出常用类型
pub use application::{
    ChatSessionController, ChatSnapshot, ChatStatus, ConversationStore, SendOutcome,
    SessionIdentityProvider,
};

pub use domain::{
    create_message, ChatDomainEvent, Conversation, Message, MessageId, Sender, SessionId,
    APOLOGY_MESSAGE, FALLBACK_REPLY, WELCOME_MESSAGE,
};

pub use infrastructure::{FileKeyValueStore, HttpWebhookAdapter, InMemoryKeyValueStore};

pub use ports::{
    KeyValueStore, StorageError, WebhookError, WebhookPort, WebhookReply, WebhookRequest,
};

use std::path::Path;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::infrastructure::EventBus;
use crate::modules::config::ChatConfig;
use crate::shared::AppResult;

/// Chat 模块容器
///
/// 管理模块内的依赖注入
pub struct ChatModule {
    controller: Arc<ChatSessionController>,
    event_bus: Arc<EventBus>,
}

impl ChatModule {
    /// 创建使用内存存储的 ChatModule（存储不可用时的降级方案）
    ///
    /// # Arguments
    /// * `config` - 聊天配置
    pub fn new(config: &ChatConfig) -> AppResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let webhook = Self::build_webhook(config)?;
        Ok(Self::with_ports(store, webhook))
    }

    /// 创建带持久化存储的 ChatModule（生产环境推荐）
    ///
    /// # Arguments
    /// * `data_dir` - 应用数据目录路径
    /// * `config` - 聊天配置
    ///
    /// # Errors
    /// 如果无法打开存储文件或构建 HTTP 客户端，返回错误
    pub async fn new_with_persistence(data_dir: &Path, config: &ChatConfig) -> AppResult<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::open(data_dir).await?);
        let webhook = Self::build_webhook(config)?;
        Ok(Self::with_ports(store, webhook))
    }

    /// 使用自定义端口实现创建 ChatModule
    pub fn with_ports(store: Arc<dyn KeyValueStore>, webhook: Arc<dyn WebhookPort>) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let controller = Arc::new(ChatSessionController::new(
            store,
            webhook,
            event_bus.clone(),
        ));

        Self {
            controller,
            event_bus,
        }
    }

    fn build_webhook(config: &ChatConfig) -> AppResult<Arc<dyn WebhookPort>> {
        if config.webhook_url().is_none() {
            tracing::warn!("Webhook URL is not configured; messages will fail to send");
        }
        let adapter = HttpWebhookAdapter::new(
            config.webhook_url().map(str::to_string),
            config.request_timeout(),
        )?;
        Ok(Arc::new(adapter))
    }

    /// 初始化会话（恢复历史或注入欢迎语）
    pub async fn initialize(&self) -> ChatSnapshot {
        self.controller.initialize().await
    }

    /// 发送消息并等待结果
    pub async fn send_message(&self, text: impl Into<String>) -> SendOutcome {
        self.controller.send_message(text).await
    }

    /// 后台发送消息
    pub fn spawn_send_message(&self, text: impl Into<String>) -> JoinHandle<SendOutcome> {
        self.controller.spawn_send_message(text)
    }

    /// 快捷回复
    pub async fn handle_quick_reply(&self, text: impl Into<String>) -> SendOutcome {
        self.controller.handle_quick_reply(text).await
    }

    /// 当前状态快照
    pub async fn snapshot(&self) -> ChatSnapshot {
        self.controller.snapshot().await
    }

    /// 订阅状态变化事件
    pub fn subscribe(&self) -> broadcast::Receiver<ChatDomainEvent> {
        self.event_bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_chat_module_integration() {
        let temp_dir = TempDir::new().unwrap();
        // 未配置 webhook：发送失败但不会崩溃
        let config = ChatConfig {
            webhook_url: None,
            request_timeout_secs: None,
        };

        let module = ChatModule::new_with_persistence(temp_dir.path(), &config)
            .await
            .unwrap();
        let mut events = module.subscribe();

        let snapshot = module.initialize().await;
        assert_eq!(snapshot.messages.len(), 1);
        assert!(matches!(
            events.recv().await.unwrap(),
            ChatDomainEvent::ConversationInitialized(_)
        ));

        let outcome = module.handle_quick_reply("Precios").await;
        assert_eq!(outcome.message().text(), APOLOGY_MESSAGE);

        // 重新打开，历史保持一致
        let reopened = ChatModule::new_with_persistence(temp_dir.path(), &config)
            .await
            .unwrap();
        let restored = reopened.initialize().await;

        assert_eq!(restored.messages, module.snapshot().await.messages);
        assert_eq!(restored.session_id, snapshot.session_id);
    }

    #[tokio::test]
    async fn test_in_memory_module_spawned_send() {
        let config = ChatConfig {
            webhook_url: None,
            request_timeout_secs: None,
        };
        let module = ChatModule::new(&config).unwrap();
        module.initialize().await;

        let outcome = module.spawn_send_message("hola").await.unwrap();

        assert!(!outcome.is_delivered());
        let snapshot = module.snapshot().await;
        assert_eq!(snapshot.messages.len(), 3);
        assert!(!snapshot.is_typing);
    }
}
