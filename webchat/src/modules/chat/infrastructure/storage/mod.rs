// Chat Infrastructure - Storage
//
// 键值存储实现：
// - InMemoryKeyValueStore: 内存存储，用于测试和持久化不可用时的降级
// - FileKeyValueStore: JSON 文件持久化存储，用于生产环境

mod file_key_value_store;
mod in_memory_key_value_store;

pub use file_key_value_store::*;
pub use in_memory_key_value_store::*;
