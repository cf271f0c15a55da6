// Config Domain Entities
//
// 聊天客户端配置

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 未提供配置文件时使用的 webhook 地址
pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5678/webhook/criemos-chatbot";

/// 聊天配置
///
/// 在构造时注入控制器，运行期间不再读取全局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatConfig {
    /// 远端 webhook 地址；null 或空字符串表示未配置
    pub webhook_url: Option<String>,
    /// 请求超时秒数；不设置则无限等待
    pub request_timeout_secs: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: Some(DEFAULT_WEBHOOK_URL.to_string()),
            request_timeout_secs: None,
        }
    }
}

impl ChatConfig {
    /// 有效的 webhook 地址（去掉空白值）
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}
