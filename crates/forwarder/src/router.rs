use std::{collections::HashSet, sync::Arc};

use tokio::task::JoinHandle;

use common::{
    config::normalize_username,
    types::{InboundMessage, ResponderChat},
    LogError,
};
use translator::Translator;

use crate::{AlbumAggregator, Forwarder};

/// Where an inbound message went
#[derive(Debug)]
pub enum Route {
    /// Reply from the responder
    Reply,
    /// Sender is not an allowed source
    Ignored,
    /// Queued to its album
    Album,
    /// Publishing on a separate task
    Single(JoinHandle<()>),
}

/// Dispatches inbound messages to translation replies, albums or direct
/// publishing
pub struct Router {
    translator: Arc<Translator>,
    forwarder: Arc<Forwarder>,
    albums: AlbumAggregator,
    responder: ResponderChat,
    sources: HashSet<String>,
}

impl Router {
    pub fn new<I, S>(
        translator: Arc<Translator>,
        forwarder: Arc<Forwarder>,
        albums: AlbumAggregator,
        sources: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            responder: ResponderChat::parse(translator.responder()),
            translator,
            forwarder,
            albums,
            sources: sources
                .into_iter()
                .map(|s| normalize_username(s.as_ref()))
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn handle(&self, msg: InboundMessage) -> Route {
        if self.responder.matches(&msg.chat) {
            self.translator.handle_reply(&msg.text);
            return Route::Reply;
        }
        let sender = normalize_username(&msg.sender);
        if sender.is_empty() {
            log::debug!("ignoring message {} without sender", msg.message_id);
            return Route::Ignored;
        }
        if !self.sources.contains(&sender) {
            log::debug!("ignoring message from {sender}: not a source");
            return Route::Ignored;
        }

        if msg.group_id.is_some() {
            self.albums.enqueue(msg);
            return Route::Album;
        }

        // translation can take a while, don't hold the dispatcher
        let forwarder = Arc::clone(&self.forwarder);
        Route::Single(tokio::spawn(async move {
            forwarder.forward_single(&msg).await.log_error_msg_with(|| {
                format!(
                    "failed to publish message {} from {sender}",
                    msg.message_id
                )
            });
        }))
    }

    pub fn pending_albums(&self) -> usize {
        self.albums.pending_groups()
    }

    pub fn pending_translations(&self) -> usize {
        self.translator.pending_count()
    }
}
