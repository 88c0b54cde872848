use async_trait::async_trait;
use teloxide::{
    payloads::{SendDocumentSetters, SendPhotoSetters, SendVideoSetters},
    requests::Requester,
    types::{InputFile, InputMedia, InputMediaDocument, InputMediaPhoto, InputMediaVideo},
    Bot,
};

use common::{
    types::{Media, OutboundPost},
    DeliveryError,
};
use forwarder::Publisher;

use crate::{recipient, MapDeliveryError};

/// Telegram allows at most 10 items in one media group
const MEDIA_GROUP_LIMIT: usize = 10;

/// Publishes posts to the destination chat by file ids of the source media
#[derive(Debug, Clone)]
pub struct TgPublisher {
    bot: Bot,
}

impl TgPublisher {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Publisher for TgPublisher {
    async fn send_single(
        &self,
        destination: &str,
        post: &OutboundPost,
    ) -> Result<(), DeliveryError> {
        let to = recipient(destination);
        let text = post.text.clone();
        match post.media.first() {
            Some(Media::Photo(id)) => self
                .bot
                .send_photo(to, InputFile::file_id(id.clone()))
                .caption(text)
                .await
                .map_delivery_error(destination),
            Some(Media::ImageDocument(id)) => self
                .bot
                .send_document(to, InputFile::file_id(id.clone()))
                .caption(text)
                .await
                .map_delivery_error(destination),
            Some(Media::VideoDocument(id)) => self
                .bot
                .send_video(to, InputFile::file_id(id.clone()))
                .caption(text)
                .await
                .map_delivery_error(destination),
            Some(Media::Other) | None => {
                if text.is_empty() {
                    return Err(DeliveryError::Empty);
                }
                self.bot
                    .send_message(to, text)
                    .await
                    .map_delivery_error(destination)
            }
        }
    }

    async fn send_group(
        &self,
        destination: &str,
        post: &OutboundPost,
    ) -> Result<(), DeliveryError> {
        let media: Vec<_> = post.media.iter().filter(|m| m.is_publishable()).collect();
        if media.is_empty() {
            return Err(DeliveryError::Empty);
        }

        // caption goes to the first item of the first group
        for (i, chunk) in media.chunks(MEDIA_GROUP_LIMIT).enumerate() {
            let group: Vec<_> = chunk
                .iter()
                .enumerate()
                .filter_map(|(j, m)| {
                    let caption = (i == 0 && j == 0).then_some(post.text.as_str());
                    input_media(m, caption)
                })
                .collect();
            log::debug!("sending media group {i} with {} items", group.len());
            self.bot
                .send_media_group(recipient(destination), group)
                .await
                .map_delivery_error(destination)?;
        }
        Ok(())
    }
}

fn input_media(media: &Media, caption: Option<&str>) -> Option<InputMedia> {
    let caption = caption.filter(|c| !c.is_empty());
    let media = match media {
        Media::Photo(id) => {
            let m = InputMediaPhoto::new(InputFile::file_id(id.clone()));
            InputMedia::Photo(match caption {
                Some(c) => m.caption(c),
                None => m,
            })
        }
        Media::ImageDocument(id) => {
            let m = InputMediaDocument::new(InputFile::file_id(id.clone()));
            InputMedia::Document(match caption {
                Some(c) => m.caption(c),
                None => m,
            })
        }
        Media::VideoDocument(id) => {
            let m = InputMediaVideo::new(InputFile::file_id(id.clone()));
            InputMedia::Video(match caption {
                Some(c) => m.caption(c),
                None => m,
            })
        }
        Media::Other => return None,
    };
    Some(media)
}
