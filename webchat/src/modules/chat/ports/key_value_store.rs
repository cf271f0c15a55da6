use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// 键值存储端口
///
/// 只提供字符串读写，结构化数据的序列化由调用方负责
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值，不存在时返回 None
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// 覆盖写入键对应的值
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}
