use std::fmt::Display;

use log::Level;
use teloxide::{
    payloads::SendMessageSetters,
    requests::Requester,
    types::{ChatId, ParseMode},
    utils::markdown::{code_block_with_lang, escape},
    Bot,
};
use tokio::sync::mpsc::Receiver;

/// Post log records to the log chat until the channel closes
pub(crate) async fn start_tg_logs_job(bot: Bot, chat_id: ChatId, mut rx: Receiver<LogMessage>) {
    while let Some(msg) = rx.recv().await {
        if let Err(e) = bot
            .send_message(chat_id, msg.to_string())
            .parse_mode(ParseMode::MarkdownV2)
            .await
        {
            // not error: it would be sent here again
            log::warn!("failed to send log to {chat_id}: {e}");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LogMessage {
    Code(String),
    Markdown(String),
}

impl LogMessage {
    pub(crate) fn log_error(
        s: impl Into<String>,
        target: &str,
        file: Option<&str>,
        line: Option<u32>,
    ) -> Self {
        let mut msg = format!("[ERROR] {}\n        at {target}", s.into());
        if let Some(file) = file {
            msg += &format!(": {file}");
            if let Some(line) = line {
                msg += &format!(":{line}");
            }
        }
        Self::Code(msg)
    }
    /// Plain text, escaped for markdown
    pub(crate) fn with_level(s: impl AsRef<str>, level: Level) -> Self {
        Self::Markdown(escape(&format!("{}: {}", level_to_string(level), s.as_ref())))
    }
}

impl Display for LogMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogMessage::Code(s) => code_block_with_lang(s, "log").fmt(f),
            LogMessage::Markdown(s) => s.fmt(f),
        }
    }
}

fn level_to_string(level: Level) -> &'static str {
    match level {
        Level::Error => "Error",
        Level::Warn => "Warning",
        Level::Info => "Info",
        Level::Debug => "Debug",
        Level::Trace => "Trace",
    }
}
