use thiserror::Error;

use crate::modules::chat::{StorageError, WebhookError};

/// 宿主程序层面的错误
///
/// 聊天流程本身从不向用户抛出错误，这里只覆盖启动和终端交互
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Webhook error: {0}")]
    Webhook(#[from] WebhookError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
