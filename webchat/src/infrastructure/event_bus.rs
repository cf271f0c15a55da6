use tokio::sync::broadcast;

use crate::modules::chat::ChatDomainEvent;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// 事件总线
///
/// 控制器通过它发布状态变化，渲染层订阅后刷新界面。
/// 没有订阅者时事件直接丢弃。
pub struct EventBus {
    sender: broadcast::Sender<ChatDomainEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: ChatDomainEvent) {
        tracing::debug!(
            "[EventBus] Publishing event: {} at {}",
            event.event_type(),
            event.timestamp()
        );
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatDomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
