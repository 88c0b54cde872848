use std::{
    collections::VecDeque,
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::{sync::oneshot, time::Instant};

static TOKEN_SEQ: AtomicU64 = AtomicU64::new(0);

/// Correlation token of one translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token(String);

impl Token {
    /// Unique for the process lifetime: `<unix millis, hex>-<sequence>`
    pub(crate) fn generate() -> Self {
        let seq = TOKEN_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:x}-{seq}", chrono::Utc::now().timestamp_millis()))
    }
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug)]
pub(crate) struct PendingTranslation {
    pub(crate) token: Token,
    pub(crate) original: String,
    pub(crate) deadline: Instant,
    settle: oneshot::Sender<String>,
}

impl PendingTranslation {
    pub(crate) fn new(
        token: Token,
        original: &str,
        deadline: Instant,
        settle: oneshot::Sender<String>,
    ) -> Self {
        Self {
            token,
            original: original.to_string(),
            deadline,
            settle,
        }
    }
    /// Deliver final text to the caller
    pub(crate) fn settle(self, text: String) {
        if self.settle.send(text).is_err() {
            log::debug!("translation {} settled, but caller is gone", self.token);
        }
    }
}

/// Pending translations in request order
#[derive(Debug, Default)]
pub(crate) struct PendingQueue {
    entries: VecDeque<PendingTranslation>,
}

impl PendingQueue {
    pub(crate) fn push(&mut self, entry: PendingTranslation) {
        debug_assert!(self.position(entry.token.as_str()).is_none());
        self.entries.push_back(entry);
    }
    pub(crate) fn pop_oldest(&mut self) -> Option<PendingTranslation> {
        self.entries.pop_front()
    }
    pub(crate) fn take(&mut self, token: &str) -> Option<PendingTranslation> {
        self.position(token).and_then(|i| self.entries.remove(i))
    }
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
    fn position(&self, token: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.token.as_str() == token)
    }
}
