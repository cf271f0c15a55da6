// Chat Ports Layer
// 端口定义了模块与外部世界的接口

mod key_value_store;
mod webhook_port;

pub use key_value_store::*;
pub use webhook_port::*;
