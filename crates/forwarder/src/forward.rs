use std::sync::Arc;

use common::{
    config::{Config, TextOnlyAlbums},
    types::{InboundMessage, Media, OutboundPost},
    DeliveryError,
};
use translator::Translator;

use crate::{
    caption::{chat_attribution, compose_caption, message_attribution},
    Publisher,
};

#[derive(Debug, Clone)]
pub struct ForwarderConfig {
    pub destination: String,
    pub source_label: String,
    pub text_only_albums: TextOnlyAlbums,
}

impl From<&Config> for ForwarderConfig {
    fn from(c: &Config) -> Self {
        Self {
            destination: c.destination.clone(),
            source_label: c.source_label.clone(),
            text_only_albums: c.text_only_albums,
        }
    }
}

/// What happened to a flushed album
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumOutcome {
    Published { media: usize },
    /// Album had no media and was published as text
    TextOnly,
    /// Album had no media and was dropped
    Dropped,
}

/// Translates, captions and publishes messages
pub struct Forwarder {
    translator: Arc<Translator>,
    publisher: Arc<dyn Publisher>,
    config: ForwarderConfig,
}

impl Forwarder {
    pub fn new(
        translator: Arc<Translator>,
        publisher: Arc<dyn Publisher>,
        config: ForwarderConfig,
    ) -> Self {
        Self {
            translator,
            publisher,
            config,
        }
    }

    /// Publish message which is not a part of an album
    pub async fn forward_single(&self, msg: &InboundMessage) -> Result<(), DeliveryError> {
        let text = self.translate(&msg.text).await;
        let post = OutboundPost {
            text: compose_caption(
                &text,
                &self.config.source_label,
                &message_attribution(&msg.chat, msg.message_id),
            ),
            media: msg.publishable_media().cloned().into_iter().collect(),
        };
        log::debug!(
            "publishing message {} from chat {} with {} media",
            msg.message_id,
            msg.chat.id,
            post.media.len()
        );
        self.publisher
            .send_single(&self.config.destination, &post)
            .await
    }

    /// Publish album messages, in arrival order, as one post
    pub async fn process_album(
        &self,
        messages: &[InboundMessage],
    ) -> Result<AlbumOutcome, DeliveryError> {
        let Some(first) = messages.first() else {
            return Ok(AlbumOutcome::Dropped);
        };

        let media: Vec<Media> = messages
            .iter()
            .filter_map(|m| m.publishable_media().cloned())
            .collect();
        let source_text = messages
            .iter()
            .map(|m| m.text.as_str())
            .find(|t| !t.trim().is_empty())
            .unwrap_or_default();

        if media.is_empty() {
            match self.config.text_only_albums {
                TextOnlyAlbums::Drop => {
                    log::warn!(
                        "album from chat {} has no media, dropping {} messages",
                        first.chat.id,
                        messages.len()
                    );
                    return Ok(AlbumOutcome::Dropped);
                }
                TextOnlyAlbums::Publish if source_text.is_empty() => {
                    log::warn!("album from chat {} is empty, dropping", first.chat.id);
                    return Ok(AlbumOutcome::Dropped);
                }
                TextOnlyAlbums::Publish => (),
            }
        }

        let text = self.translate(source_text).await;
        let post = OutboundPost {
            text: compose_caption(
                &text,
                &self.config.source_label,
                &chat_attribution(&first.chat),
            ),
            media,
        };

        if post.media.is_empty() {
            self.publisher
                .send_single(&self.config.destination, &post)
                .await?;
            Ok(AlbumOutcome::TextOnly)
        } else {
            let count = post.media.len();
            self.publisher
                .send_group(&self.config.destination, &post)
                .await?;
            Ok(AlbumOutcome::Published { media: count })
        }
    }

    async fn translate(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        self.translator.translate(text).await
    }
}
