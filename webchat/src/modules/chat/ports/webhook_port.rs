use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use super::super::domain::SessionId;

/// 请求体中固定的渠道标识
pub const WEBCHAT_CHANNEL: &str = "webchat";

/// Webhook 错误类型
///
/// 所有变体对用户都表现为同一条道歉消息
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook URL is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Webhook returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid webhook response: {0}")]
    InvalidResponse(String),
}

/// 发往远端自动化流程的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookRequest {
    pub user_id: String,
    pub text: String,
    pub channel: &'static str,
}

impl WebhookRequest {
    pub fn new(session_id: &SessionId, text: impl Into<String>) -> Self {
        Self {
            user_id: session_id.as_str().to_string(),
            text: text.into(),
            channel: WEBCHAT_CHANNEL,
        }
    }
}

/// 远端成功响应中核心关心的部分
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookReply {
    /// 回复文本，缺失或非字符串时为 None
    pub text: Option<String>,
    /// 响应中是否带有非空的 quickReplies 列表
    pub has_quick_replies: bool,
}

impl WebhookReply {
    /// 从已解析的 JSON 响应体中提取回复
    ///
    /// `null` 响应体视为无效；其他非对象的值按缺少字段处理
    pub fn from_json(body: &serde_json::Value) -> Result<Self, WebhookError> {
        if body.is_null() {
            return Err(WebhookError::InvalidResponse(
                "response body is null".to_string(),
            ));
        }

        let text = body
            .get("text")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let has_quick_replies = body
            .get("quickReplies")
            .and_then(|v| v.as_array())
            .is_some_and(|replies| !replies.is_empty());

        Ok(Self {
            text,
            has_quick_replies,
        })
    }
}

/// Webhook 端口 - 远端自动化流程的抽象
#[async_trait]
pub trait WebhookPort: Send + Sync {
    /// 发送一次请求（不重试）
    async fn deliver(&self, request: WebhookRequest) -> Result<WebhookReply, WebhookError>;
}
