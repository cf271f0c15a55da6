// 文件持久化键值存储
//
// 所有键保存在同一个 JSON 文件中，每次写入整体覆盖。
// 先写临时文件再重命名，写到一半崩溃不会破坏已有数据。

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;

use crate::modules::chat::ports::{KeyValueStore, StorageError};

const STORE_FILE_NAME: &str = "webchat_store.json";

/// 文件键值存储
pub struct FileKeyValueStore {
    values: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl FileKeyValueStore {
    /// 打开（或创建）数据目录下的存储文件
    ///
    /// # Arguments
    /// * `data_dir` - 应用数据目录路径
    pub async fn open(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir).await?;
        let file_path = data_dir.join(STORE_FILE_NAME);

        let values = match fs::read_to_string(&file_path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(
                    "Store file {} is unreadable ({}), starting empty",
                    file_path.display(),
                    e
                );
                HashMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            values: RwLock::new(values),
            file_path,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(values)?;
        let tmp_path = self.file_path.with_extension("json.tmp");

        fs::write(&tmp_path, content).await?;
        fs::rename(&tmp_path, &self.file_path).await?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.read().await;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        // 持有写锁直到落盘，保证文件写入顺序与内存一致
        let mut values = self.values.write().await;
        values.insert(key.to_string(), value);
        self.persist(&values).await
    }
}
