// Chat Infrastructure - Adapters
// 外部服务适配器

pub mod webhook;
