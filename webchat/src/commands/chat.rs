// Chat Commands - 终端宿主
//
// 从标准输入读取行，转换为 ChatModule 的操作并把结果渲染回终端

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::modules::chat::{ChatModule, ChatSnapshot, Message, Sender};
use crate::shared::AppResult;

/// 终端输入解析后的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// 普通消息，原样发送
    Send(String),
    /// `/quick <text>`：快捷回复
    QuickReply(String),
    /// `/show`：重新打印完整对话
    Show,
    /// `/quit` 或 `/exit`
    Quit,
    /// 空行
    Ignore,
}

const QUICK_PREFIX: &str = "/quick ";

/// 解析一行输入
///
/// 只拦截已知命令；其他内容（包括以 `/` 开头的文本）按原样作为消息发送
pub fn parse_input(line: &str) -> HostCommand {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let trimmed = line.trim();

    match trimmed {
        "" => HostCommand::Ignore,
        "/show" => HostCommand::Show,
        "/quit" | "/exit" => HostCommand::Quit,
        _ => match trimmed.strip_prefix(QUICK_PREFIX) {
            Some(text) if !text.trim().is_empty() => {
                HostCommand::QuickReply(text.trim().to_string())
            }
            _ => HostCommand::Send(line.to_string()),
        },
    }
}

fn render_message(message: &Message) -> String {
    let label = match message.sender() {
        Sender::User => "tú",
        Sender::Bot => "criemos",
    };
    format!(
        "[{}] {}: {}\n",
        message.timestamp().format("%H:%M"),
        label,
        message.text()
    )
}

fn render_snapshot(snapshot: &ChatSnapshot) -> String {
    let mut out = String::new();
    for message in &snapshot.messages {
        out.push_str(&render_message(message));
    }
    if snapshot.show_quick_replies {
        out.push_str("(usa /quick <texto> para una respuesta rápida)\n");
    }
    out
}

/// 运行交互循环，直到输入结束或收到 `/quit`
pub async fn run_host<R, W>(module: &ChatModule, reader: R, mut writer: W) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let snapshot = module.initialize().await;
    tracing::info!("Chat host ready for session {}", snapshot.session_id);
    writer
        .write_all(render_snapshot(&snapshot).as_bytes())
        .await?;
    writer.flush().await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match parse_input(&line) {
            HostCommand::Send(text) => module.send_message(text).await,
            HostCommand::QuickReply(text) => module.handle_quick_reply(text).await,
            HostCommand::Show => {
                let snapshot = module.snapshot().await;
                writer
                    .write_all(render_snapshot(&snapshot).as_bytes())
                    .await?;
                writer.flush().await?;
                continue;
            }
            HostCommand::Quit => break,
            HostCommand::Ignore => continue,
        };

        writer
            .write_all(render_message(outcome.message()).as_bytes())
            .await?;
        if module.snapshot().await.show_quick_replies {
            writer
                .write_all("(usa /quick <texto> para una respuesta rápida)\n".as_bytes())
                .await?;
        }
        writer.flush().await?;
    }

    tracing::info!("Chat host stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::{
        InMemoryKeyValueStore, WebhookError, WebhookPort, WebhookReply, WebhookRequest,
        APOLOGY_MESSAGE, WELCOME_MESSAGE,
    };
    use async_trait::async_trait;
    use std::sync::Arc;

    struct EchoWebhook;

    #[async_trait]
    impl WebhookPort for EchoWebhook {
        async fn deliver(&self, request: WebhookRequest) -> Result<WebhookReply, WebhookError> {
            Ok(WebhookReply {
                text: Some(format!("eco: {}", request.text)),
                has_quick_replies: false,
            })
        }
    }

    struct OfflineWebhook;

    #[async_trait]
    impl WebhookPort for OfflineWebhook {
        async fn deliver(&self, _request: WebhookRequest) -> Result<WebhookReply, WebhookError> {
            Err(WebhookError::Network("connection refused".to_string()))
        }
    }

    fn module_with(webhook: Arc<dyn WebhookPort>) -> ChatModule {
        ChatModule::with_ports(Arc::new(InMemoryKeyValueStore::new()), webhook)
    }

    #[test]
    fn test_parse_input_commands() {
        assert_eq!(
            parse_input("/quick Ver precios"),
            HostCommand::QuickReply("Ver precios".to_string())
        );
        assert_eq!(parse_input("/show"), HostCommand::Show);
        assert_eq!(parse_input(" /quit "), HostCommand::Quit);
        assert_eq!(parse_input("/exit\r"), HostCommand::Quit);
        assert_eq!(parse_input(""), HostCommand::Ignore);
        assert_eq!(parse_input("   "), HostCommand::Ignore);
    }

    #[test]
    fn test_parse_input_keeps_message_text_untouched() {
        assert_eq!(parse_input("hola"), HostCommand::Send("hola".to_string()));
        assert_eq!(
            parse_input("  ¿Qué ofrecen?  "),
            HostCommand::Send("  ¿Qué ofrecen?  ".to_string())
        );
        assert_eq!(
            parse_input("/help me"),
            HostCommand::Send("/help me".to_string())
        );
        assert_eq!(parse_input("/quick"), HostCommand::Send("/quick".to_string()));
        assert_eq!(
            parse_input("/showroom abierto?"),
            HostCommand::Send("/showroom abierto?".to_string())
        );
    }

    #[tokio::test]
    async fn test_run_host_renders_welcome_and_replies() {
        let module = module_with(Arc::new(EchoWebhook));
        let input: &[u8] = b"hola\n/quit\nnunca\n";
        let mut output = Vec::new();

        run_host(&module, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(WELCOME_MESSAGE));
        assert!(output.contains("/quick"));
        assert!(output.contains("criemos: eco: hola"));
        assert!(!output.contains("nunca"));

        let snapshot = module.snapshot().await;
        assert_eq!(snapshot.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_run_host_prints_apology_on_failure() {
        let module = module_with(Arc::new(OfflineWebhook));
        let input: &[u8] = b"/quick Precios\n";
        let mut output = Vec::new();

        run_host(&module, input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(APOLOGY_MESSAGE));

        let snapshot = module.snapshot().await;
        assert_eq!(snapshot.messages[1].text(), "Precios");
        assert!(!snapshot.is_typing);
    }
}
