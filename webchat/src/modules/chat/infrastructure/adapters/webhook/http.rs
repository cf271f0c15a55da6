use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::modules::chat::ports::{WebhookError, WebhookPort, WebhookReply, WebhookRequest};

/// 基于 reqwest 的 Webhook 适配器
///
/// 每条消息只发送一次 POST，不做重试
pub struct HttpWebhookAdapter {
    client: Client,
    webhook_url: Option<String>,
}

impl HttpWebhookAdapter {
    /// 创建适配器
    ///
    /// # Arguments
    /// * `webhook_url` - 远端地址，None 表示未配置（发送时失败而非启动时崩溃）
    /// * `timeout` - 请求超时，None 表示不设超时
    pub fn new(webhook_url: Option<String>, timeout: Option<Duration>) -> Result<Self, WebhookError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WebhookError::Network(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }
}

#[async_trait]
impl WebhookPort for HttpWebhookAdapter {
    async fn deliver(&self, request: WebhookRequest) -> Result<WebhookReply, WebhookError> {
        let url = self.webhook_url.as_deref().ok_or(WebhookError::NotConfigured)?;

        debug!("Posting message to webhook {} for user {}", url, request.user_id);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| WebhookError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("Webhook returned {} - {}", status, body);
            return Err(WebhookError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| WebhookError::Network(e.to_string()))?;
        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| WebhookError::InvalidResponse(e.to_string()))?;

        WebhookReply::from_json(&json)
    }
}
