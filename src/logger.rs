use log::{
    kv::{Key, Source},
    Level, LevelFilter, Metadata, Record,
};
use simplelog::SharedLogger;
use tokio::sync::mpsc::Sender;

use crate::handlers::tg_logs::LogMessage;

/// Record key to send a non-error record to telegram: `log::info!(tg = true; "...")`
const TG_KEY: &str = "tg";

#[derive(Debug, Clone, Default)]
pub(crate) struct Config {
    /// Records containing any of these are not sent
    ignore: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct ConfigBuilder(Config);

impl ConfigBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }
    pub(crate) fn add_ignore(&mut self, s: &str) -> &mut Self {
        self.0.ignore.push(s.to_string());
        self
    }
    pub(crate) fn build(&mut self) -> Config {
        self.0.clone()
    }
}

/// Mirrors errors, and records marked with `tg = true`, to the log chat
#[derive(Debug)]
pub(crate) struct TgLogger {
    sender: Sender<LogMessage>,
    config: Config,
}

impl TgLogger {
    pub(crate) fn new(sender: Sender<LogMessage>, config: Config) -> Box<Self> {
        Box::new(Self { sender, config })
    }
    fn message(&self, record: &Record) -> Option<LogMessage> {
        let text = record.args().to_string();
        if self.config.ignore.iter().any(|i| text.contains(i.as_str())) {
            return None;
        }
        let msg = if record.level() == Level::Error {
            LogMessage::log_error(text, record.target(), record.file(), record.line())
        } else if is_marked(record) {
            LogMessage::with_level(text, record.level())
        } else {
            return None;
        };
        Some(msg)
    }
}

impl log::Log for TgLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Some(msg) = self.message(record) {
            // drop when log chat can't keep up
            let _ = self.sender.try_send(msg);
        }
    }

    fn flush(&self) {}
}

impl SharedLogger for TgLogger {
    fn level(&self) -> LevelFilter {
        LevelFilter::Info
    }

    fn config(&self) -> Option<&simplelog::Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn log::Log> {
        Box::new(*self)
    }
}

fn is_marked(record: &Record) -> bool {
    record
        .key_values()
        .get(Key::from_str(TG_KEY))
        .and_then(|v| v.to_bool())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use log::Log;
    use tokio::sync::mpsc;

    use super::*;

    fn log_record(logger: &TgLogger, level: Level, msg: &str, marked: bool) {
        let kvs: &[(&str, bool)] = if marked { &[(TG_KEY, true)] } else { &[] };
        logger.log(
            &Record::builder()
                .level(level)
                .args(format_args!("{msg}"))
                .key_values(&kvs)
                .build(),
        );
    }

    #[test]
    fn test_errors_and_marked_records() {
        let (tx, mut rx) = mpsc::channel(10);
        let logger = TgLogger::new(tx, ConfigBuilder::new().add_ignore("ConnectionReset").build());

        log_record(&logger, Level::Error, "failed", false);
        log_record(&logger, Level::Error, "ConnectionReset by peer", false);
        log_record(&logger, Level::Info, "plain info", false);
        log_record(&logger, Level::Info, "started", true);
        log_record(&logger, Level::Debug, "debug", true);

        assert!(matches!(
            rx.try_recv(),
            Ok(LogMessage::Code(s)) if s.starts_with("[ERROR] failed")
        ));
        assert_eq!(rx.try_recv().ok(), Some(LogMessage::Markdown("Info: started".to_string())));
        assert!(rx.try_recv().is_err());
    }
}
