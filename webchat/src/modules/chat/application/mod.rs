// Chat Application Layer - 应用层
// 会话控制器编排身份、存储和远端 webhook

mod controller;
pub mod services;

pub use controller::*;
pub use services::{
    ConversationStore, SessionIdentityProvider, MESSAGES_KEY, SESSION_ID_KEY,
};
