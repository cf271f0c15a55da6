// Chat Domain - Value Objects
// 值对象是不可变的，通过值而非标识来比较

mod message_id;
mod sender;
mod session_id;

pub use message_id::*;
pub use sender::*;
pub use session_id::*;
