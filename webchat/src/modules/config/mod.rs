// Config Module
//
// 配置管理模块，采用六边形架构
//
// 层次结构:
// - domain: 配置实体
// - ports: 配置读写的抽象接口
// - infrastructure: 文件与内存两种存储适配器

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{ChatConfig, DEFAULT_WEBHOOK_URL};
pub use infrastructure::{InMemoryConfigRepository, StoreConfigRepository};
pub use ports::{ConfigError, ConfigRepository};

use std::path::Path;
use std::sync::Arc;

/// 覆盖 webhook 地址的环境变量（空字符串表示未配置）
pub const ENV_WEBHOOK_URL: &str = "CRIEMOS_WEBHOOK_URL";
/// 覆盖请求超时的环境变量
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "CRIEMOS_REQUEST_TIMEOUT_SECS";

/// Config 模块容器
pub struct ConfigModule {
    repository: Arc<dyn ConfigRepository>,
}

impl ConfigModule {
    /// 使用内存仓储创建（用于测试）
    pub fn new_in_memory() -> Self {
        Self::with_repository(Arc::new(InMemoryConfigRepository::new()))
    }

    /// 使用数据目录下的配置文件创建
    pub fn new_with_store(data_dir: &Path) -> Self {
        Self::with_repository(Arc::new(StoreConfigRepository::new(data_dir)))
    }

    pub fn with_repository(repository: Arc<dyn ConfigRepository>) -> Self {
        Self { repository }
    }

    /// 读取配置文件；失败时记录警告并使用默认配置
    pub async fn load(&self) -> ChatConfig {
        match self.repository.load().await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                ChatConfig::default()
            }
        }
    }

    /// 读取配置并应用进程环境变量覆盖
    pub async fn load_effective(&self) -> ChatConfig {
        let config = self.load().await;
        apply_env_overrides(config, |key| std::env::var(key).ok())
    }

    pub async fn save(&self, config: &ChatConfig) -> Result<(), ConfigError> {
        self.repository.save(config).await
    }
}

/// 应用环境变量覆盖
///
/// `lookup` 抽象了环境读取，测试中可以注入固定值
pub fn apply_env_overrides<F>(mut config: ChatConfig, lookup: F) -> ChatConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_WEBHOOK_URL) {
        let url = url.trim().to_string();
        config.webhook_url = if url.is_empty() { None } else { Some(url) };
    }

    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        match raw.trim().parse::<u64>() {
            Ok(secs) => config.request_timeout_secs = Some(secs),
            Err(e) => tracing::warn!(
                "Ignoring {}={:?}: {}",
                ENV_REQUEST_TIMEOUT_SECS,
                raw,
                e
            ),
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn test_config_module_integration() {
        let module = ConfigModule::new_in_memory();
        assert_eq!(module.load().await, ChatConfig::default());

        let custom = ChatConfig {
            webhook_url: Some("https://n8n.example.com/webhook/chat".to_string()),
            request_timeout_secs: None,
        };
        module.save(&custom).await.unwrap();

        assert_eq!(module.load().await, custom);
    }

    #[tokio::test]
    async fn test_broken_config_file_falls_back_to_default() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("config.json"), "[1, 2").unwrap();

        let module = ConfigModule::new_with_store(temp_dir.path());

        assert_eq!(module.load().await, ChatConfig::default());
    }

    #[test]
    fn test_env_overrides_url() {
        let config = apply_env_overrides(
            ChatConfig::default(),
            env(&[(ENV_WEBHOOK_URL, "https://hooks.example.com/x")]),
        );
        assert_eq!(config.webhook_url(), Some("https://hooks.example.com/x"));
    }

    #[test]
    fn test_empty_env_url_means_unconfigured() {
        let config = apply_env_overrides(ChatConfig::default(), env(&[(ENV_WEBHOOK_URL, "")]));
        assert!(config.webhook_url().is_none());
    }

    #[test]
    fn test_env_timeout() {
        let config = apply_env_overrides(
            ChatConfig::default(),
            env(&[(ENV_REQUEST_TIMEOUT_SECS, "12")]),
        );
        assert_eq!(config.request_timeout_secs, Some(12));

        let config = apply_env_overrides(
            ChatConfig::default(),
            env(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]),
        );
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_no_env_keeps_file_values() {
        let file_config = ChatConfig {
            webhook_url: Some("https://from-file".to_string()),
            request_timeout_secs: Some(3),
        };
        assert_eq!(apply_env_overrides(file_config.clone(), env(&[])), file_config);
    }
}
