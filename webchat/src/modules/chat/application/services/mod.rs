// Chat Application - Services
// 会话身份与会话历史的存取，均为尽力而为，失败只记录日志

mod conversation_store;
mod session_identity;

pub use conversation_store::*;
pub use session_identity::*;
