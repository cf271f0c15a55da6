// File-based Config Repository
//
// 将配置保存为数据目录下的 config.json

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use crate::modules::config::domain::ChatConfig;
use crate::modules::config::ports::{ConfigError, ConfigRepository};

const CONFIG_FILE_NAME: &str = "config.json";

/// 文件配置仓储
pub struct StoreConfigRepository {
    /// 配置文件路径
    config_path: PathBuf,
    /// 内存缓存
    cache: RwLock<Option<ChatConfig>>,
}

impl StoreConfigRepository {
    /// # Arguments
    /// * `data_dir` - 应用数据目录
    pub fn new(data_dir: &Path) -> Self {
        Self {
            config_path: data_dir.join(CONFIG_FILE_NAME),
            cache: RwLock::new(None),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    async fn load_from_file(&self) -> Result<Option<ChatConfig>, ConfigError> {
        let content = match tokio::fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::StorageError(e.to_string())),
        };

        let config: ChatConfig = serde_json::from_str(&content)?;
        Ok(Some(config))
    }

    async fn save_to_file(&self, config: &ChatConfig) -> Result<(), ConfigError> {
        // 确保目录存在
        if let Some(parent) = self.config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::StorageError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(config)?;

        tokio::fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl ConfigRepository for StoreConfigRepository {
    async fn load(&self) -> Result<ChatConfig, ConfigError> {
        // 先检查缓存
        {
            let cache = self.cache.read().await;
            if let Some(ref config) = *cache {
                return Ok(config.clone());
            }
        }

        let config = self.load_from_file().await?.unwrap_or_default();

        {
            let mut cache = self.cache.write().await;
            *cache = Some(config.clone());
        }

        Ok(config)
    }

    async fn save(&self, config: &ChatConfig) -> Result<(), ConfigError> {
        self.save_to_file(config).await?;

        let mut cache = self.cache.write().await;
        *cache = Some(config.clone());

        Ok(())
    }

    async fn exists(&self) -> Result<bool, ConfigError> {
        tokio::fs::try_exists(&self.config_path)
            .await
            .map_err(|e| ConfigError::StorageError(e.to_string()))
    }
}
