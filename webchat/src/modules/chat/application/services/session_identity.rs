use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::modules::chat::domain::SessionId;
use crate::modules::chat::ports::KeyValueStore;

/// 会话 ID 在存储中的键
pub const SESSION_ID_KEY: &str = "criemos_session_id";

/// 会话身份提供者
///
/// 首次调用时从存储读取会话 ID，不存在则生成并写回；
/// 结果在提供者生命周期内缓存，之后的调用不再访问存储。
pub struct SessionIdentityProvider {
    store: Arc<dyn KeyValueStore>,
    cached: OnceCell<SessionId>,
}

impl SessionIdentityProvider {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            cached: OnceCell::new(),
        }
    }

    /// 获取或创建会话 ID，从不失败
    ///
    /// 存储读写失败时退化为仅在本进程内有效的临时 ID
    pub async fn get_or_create_session_id(&self) -> SessionId {
        self.cached.get_or_init(|| self.resolve()).await.clone()
    }

    async fn resolve(&self) -> SessionId {
        match self.store.get(SESSION_ID_KEY).await {
            Ok(Some(raw)) => {
                if let Some(id) = SessionId::from_stored(&raw) {
                    tracing::debug!("Restored session id {}", id);
                    return id;
                }
            }
            Ok(None) => {}
            Err(e) => {
                let id = SessionId::generate();
                tracing::warn!(
                    "Failed to read session id ({}), using ephemeral id {}",
                    e,
                    id
                );
                return id;
            }
        }

        let id = SessionId::generate();
        match self.store.set(SESSION_ID_KEY, id.as_str().to_string()).await {
            Ok(()) => tracing::info!("Created session id {}", id),
            Err(e) => tracing::warn!(
                "Failed to persist session id ({}), {} is ephemeral",
                e,
                id
            ),
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::infrastructure::InMemoryKeyValueStore;
    use crate::modules::chat::ports::StorageError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 读写都失败的存储
    struct BrokenStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("disk gone".to_string()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StorageError::Unavailable("disk gone".to_string()))
        }
    }

    #[tokio::test]
    async fn test_creates_and_persists_id() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let provider = SessionIdentityProvider::new(store.clone());

        let id = provider.get_or_create_session_id().await;
        let stored = store.get(SESSION_ID_KEY).await.unwrap();

        assert_eq!(stored.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_returns_stored_id() {
        let store = Arc::new(InMemoryKeyValueStore::with_entries([(
            SESSION_ID_KEY,
            "visitor-7",
        )]));
        let provider = SessionIdentityProvider::new(store);

        assert_eq!(provider.get_or_create_session_id().await.as_str(), "visitor-7");
    }

    #[tokio::test]
    async fn test_stable_across_providers() {
        let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());

        let first = SessionIdentityProvider::new(store.clone())
            .get_or_create_session_id()
            .await;
        let second = SessionIdentityProvider::new(store)
            .get_or_create_session_id()
            .await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_blank_stored_id_is_replaced() {
        let store = Arc::new(InMemoryKeyValueStore::with_entries([(SESSION_ID_KEY, "  ")]));
        let provider = SessionIdentityProvider::new(store.clone());

        let id = provider.get_or_create_session_id().await;

        assert!(!id.as_str().trim().is_empty());
        assert_eq!(
            store.get(SESSION_ID_KEY).await.unwrap().as_deref(),
            Some(id.as_str())
        );
    }

    #[tokio::test]
    async fn test_storage_failure_yields_memoized_ephemeral_id() {
        let store = Arc::new(BrokenStore {
            calls: AtomicUsize::new(0),
        });
        let provider = SessionIdentityProvider::new(store.clone());

        let first = provider.get_or_create_session_id().await;
        let second = provider.get_or_create_session_id().await;

        assert_eq!(first, second);
        // 只在第一次解析时访问存储
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}
