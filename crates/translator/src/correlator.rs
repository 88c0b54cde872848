use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    sync::oneshot,
    time::{self, Instant},
};

use common::config::{Config, ReplyMatching, SourceScript};

use crate::{
    lang::contains_source_script,
    pending::{PendingQueue, PendingTranslation, Token},
    MessageChannel,
};

#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Chat shared with the responder, chat id or username
    pub responder: String,
    pub timeout: Duration,
    pub script: SourceScript,
    pub matching: ReplyMatching,
}

impl From<&Config> for TranslatorConfig {
    fn from(c: &Config) -> Self {
        Self {
            responder: c.responder.clone(),
            timeout: c.timeouts.translation(),
            script: c.source_script,
            matching: c.reply_matching,
        }
    }
}

/// Sends texts to the responder and pairs its replies with waiting callers
pub struct Translator {
    channel: Arc<dyn MessageChannel>,
    config: TranslatorConfig,
    pending: Mutex<PendingQueue>,
    // registration and sending happen under this lock, so requests reach the
    // responder in queue order
    send_lock: tokio::sync::Mutex<()>,
}

impl Translator {
    pub fn new(channel: Arc<dyn MessageChannel>, config: TranslatorConfig) -> Self {
        Self {
            channel,
            config,
            pending: Mutex::default(),
            send_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn responder(&self) -> &str {
        &self.config.responder
    }

    /// Translate text, falling back to it on any failure or timeout
    pub async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() || !contains_source_script(text, self.config.script) {
            return text.to_string();
        }

        let token = Token::generate();
        let queued = Instant::now();
        let (tx, mut rx) = oneshot::channel();

        let (registration, deadline) = {
            let _send = self.send_lock.lock().await;
            // never sent once the caller's time is up
            if queued.elapsed() >= self.config.timeout {
                log::warn!("translation {token} was not sent in time, keeping original text");
                return text.to_string();
            }
            let deadline = Instant::now() + self.config.timeout;
            let registration = Registration::new(
                &self.pending,
                PendingTranslation::new(token.clone(), text, deadline, tx),
            );

            let request = format!("{token}\n{text}");
            if let Err(e) = self.channel.send_text(&self.config.responder, &request).await {
                log::error!("failed to send translation request {token}: {e}");
                return text.to_string();
            }
            (registration, deadline)
        };
        log::debug!("sent translation request {token}");

        match time::timeout_at(deadline, &mut rx).await {
            Ok(Ok(translated)) => translated,
            Ok(Err(_)) => {
                log::error!("translation {token} was dropped without reply");
                text.to_string()
            }
            Err(_) => {
                if registration.release().is_some() {
                    log::warn!("translation {token} timed out, keeping original text");
                    text.to_string()
                } else {
                    // reply settled the entry right at the deadline
                    rx.try_recv().unwrap_or_else(|_| text.to_string())
                }
            }
        }
    }

    /// Settle a pending translation with responder's reply
    ///
    /// The first line of the reply is dropped, the rest is the translation.
    pub fn handle_reply(&self, reply: &str) {
        let (first_line, payload) = split_reply(reply);

        let entry = {
            let mut pending = lock(&self.pending);
            match self.config.matching {
                ReplyMatching::Fifo => pending.pop_oldest(),
                ReplyMatching::PreferToken => {
                    pending.take(first_line).or_else(|| pending.pop_oldest())
                }
            }
        };
        let Some(entry) = entry else {
            log::debug!("got reply from responder without pending translations, dropping");
            return;
        };

        log::debug!(
            "settling translation {}, {:?} before deadline",
            entry.token,
            entry.deadline.saturating_duration_since(Instant::now())
        );
        let translated = if payload.is_empty() {
            log::warn!("empty reply for translation {}, keeping original text", entry.token);
            entry.original.clone()
        } else {
            payload.to_string()
        };
        entry.settle(translated);
    }

    /// Count of requests waiting for reply
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// Entry in pending queue, removed when dropped
struct Registration<'a> {
    pending: &'a Mutex<PendingQueue>,
    token: Token,
}

impl<'a> Registration<'a> {
    fn new(pending: &'a Mutex<PendingQueue>, entry: PendingTranslation) -> Self {
        let token = entry.token.clone();
        lock(pending).push(entry);
        Self { pending, token }
    }
    /// Remove entry, `None` if it was already taken by a reply
    fn release(&self) -> Option<PendingTranslation> {
        lock(self.pending).take(self.token.as_str())
    }
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

fn lock(pending: &Mutex<PendingQueue>) -> MutexGuard<'_, PendingQueue> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `"label\ntext"` -> `("label", "text")`
fn split_reply(reply: &str) -> (&str, &str) {
    match reply.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest.trim()),
        None => (reply.trim(), ""),
    }
}

#[cfg(test)]
mod split_tests {
    use super::split_reply;

    #[test]
    fn test_split_reply() {
        let table = [
            ("1\nمرحبا", ("1", "مرحبا")),
            ("label\nline one\nline two\n", ("label", "line one\nline two")),
            ("only label", ("only label", "")),
            ("", ("", "")),
        ];
        for (i, (reply, expected)) in table.iter().enumerate() {
            assert_eq!(split_reply(reply), *expected, "test table[{i}]");
        }
    }
}
