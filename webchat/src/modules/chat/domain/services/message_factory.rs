use chrono::Utc;

use super::super::entities::Message;
use super::super::value_objects::{MessageId, Sender};

/// 首次加载时注入的欢迎语
pub const WELCOME_MESSAGE: &str = "Hola! Soy el asistente de Criemos. ¿En qué puedo ayudarte?";

/// 远端成功响应但没有可用 `text` 时的回复
pub const FALLBACK_REPLY: &str =
    "Lo siento, no pude procesar tu mensaje. Por favor intenta de nuevo.";

/// 任何发送失败时追加的道歉消息
pub const APOLOGY_MESSAGE: &str = "Disculpa, hubo un problema al conectar con el servidor. Por favor intenta de nuevo en unos momentos.";

/// 创建消息：生成新的 ID 和当前时间戳，不校验文本内容
pub fn create_message(text: impl Into<String>, sender: Sender) -> Message {
    Message::from_parts(MessageId::generate(), sender, text, Utc::now())
}

pub fn create_welcome_message() -> Message {
    create_message(WELCOME_MESSAGE, Sender::Bot)
}

pub fn create_apology_message() -> Message {
    create_message(APOLOGY_MESSAGE, Sender::Bot)
}

/// 根据远端回复文本创建机器人消息，空文本使用兜底回复
pub fn create_reply_message(reply_text: Option<&str>) -> Message {
    let text = match reply_text {
        Some(text) if !text.is_empty() => text,
        _ => FALLBACK_REPLY,
    };
    create_message(text, Sender::Bot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_message_does_not_touch_text() {
        let msg = create_message("  <b>hola</b>  ", Sender::User);
        assert_eq!(msg.text(), "  <b>hola</b>  ");
        assert_eq!(msg.sender(), Sender::User);
    }

    #[test]
    fn test_create_message_fresh_ids() {
        let a = create_message("x", Sender::Bot);
        let b = create_message("x", Sender::Bot);
        assert_ne!(a.id(), b.id());
        assert!(b.timestamp() >= a.timestamp());
    }

    #[test]
    fn test_reply_message_fallback() {
        assert_eq!(create_reply_message(Some("ok")).text(), "ok");
        assert_eq!(create_reply_message(Some("")).text(), FALLBACK_REPLY);
        assert_eq!(create_reply_message(None).text(), FALLBACK_REPLY);
        assert!(create_reply_message(None).is_from_bot());
    }

    #[test]
    fn test_canned_messages_are_from_bot() {
        assert_eq!(create_welcome_message().text(), WELCOME_MESSAGE);
        assert_eq!(create_apology_message().text(), APOLOGY_MESSAGE);
        assert!(create_welcome_message().is_from_bot());
    }
}
