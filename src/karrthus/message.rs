use std::path::Path;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

/// Channel used when a console line names none.
pub const CONSOLE_CHANNEL: &str = "console";

/// One chat message seen by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub user: String,
    pub channel: String,
    pub text: String
}

impl ChatMessage {
    pub fn new(user: impl Into<String>, channel: impl Into<String>, text: impl Into<String>) -> ChatMessage {
        ChatMessage { user: user.into(), channel: channel.into(), text: text.into() }
    }

    /// `channel: text`, or just `text` for the console channel.
    pub fn from_console_line(user: &str, line: &str) -> Option<ChatMessage> {
        let line = line.trim();
        if line.is_empty() { return None; }
        match line.split_once(": ") {
            Some((channel, text)) if !channel.is_empty() && !channel.contains(char::is_whitespace) =>
                Some(ChatMessage::new(user, channel, text.trim())),
            _ => Some(ChatMessage::new(user, CONSOLE_CHANNEL, line))
        }
    }
}

/// Way back to the chat platform.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_message(&self, channel: &str, message: &str) -> anyhow::Result<()>;
    async fn upload_file(&self, channel: &str, file: &Path, message: &str) -> anyhow::Result<()>;
}

/// Prints replies to stdout.
pub struct ConsoleSink;

#[async_trait]
impl ChatSink for ConsoleSink {
    async fn send_message(&self, channel: &str, message: &str) -> anyhow::Result<()> {
        let line = format!("[{}] {}\n", channel, message);
        tokio::io::stdout().write_all(line.as_bytes()).await?;
        Ok(())
    }

    async fn upload_file(&self, channel: &str, file: &Path, message: &str) -> anyhow::Result<()> {
        let line = format!("[{}] {} ({})\n", channel, message, file.display());
        tokio::io::stdout().write_all(line.as_bytes()).await?;
        Ok(())
    }
}
