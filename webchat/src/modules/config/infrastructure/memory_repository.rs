// In-Memory Config Repository
//
// 基于内存的配置仓储实现（用于测试）

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::modules::config::domain::ChatConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

/// 内存配置仓储
pub struct InMemoryConfigRepository {
    config: RwLock<Option<ChatConfig>>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self {
            config: RwLock::new(None),
        }
    }

    pub fn with_config(config: ChatConfig) -> Self {
        Self {
            config: RwLock::new(Some(config)),
        }
    }
}

impl Default for InMemoryConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigRepository for InMemoryConfigRepository {
    async fn load(&self) -> Result<ChatConfig, ConfigError> {
        let config = self.config.read().await;
        Ok(config.clone().unwrap_or_default())
    }

    async fn save(&self, config: &ChatConfig) -> Result<(), ConfigError> {
        let mut current = self.config.write().await;
        *current = Some(config.clone());
        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        Ok(self.config.read().await.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_default_config() {
        let repo = InMemoryConfigRepository::new();
        assert!(!repo.exists().await.unwrap());
        assert_eq!(repo.load().await.unwrap(), ChatConfig::default());
    }

    #[tokio::test]
    async fn test_save_and_load_config() {
        let repo = InMemoryConfigRepository::new();
        let config = ChatConfig {
            webhook_url: Some("https://n8n.example.com/webhook/chat".to_string()),
            request_timeout_secs: Some(30),
        };

        repo.save(&config).await.unwrap();

        assert!(repo.exists().await.unwrap());
        assert_eq!(repo.load().await.unwrap(), config);
    }
}
