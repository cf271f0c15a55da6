use serde::{Deserialize, Serialize};

/// 消息发送方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// 访客
    User,
    /// 远端自动化流程（包括欢迎语和错误提示）
    Bot,
}
