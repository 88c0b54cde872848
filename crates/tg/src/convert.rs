use teloxide::types::Message;

use common::types::{ChatRef, InboundMessage, Media};

/// Convert telegram message to relay message
///
/// Channel posts are attributed to the channel, everything else to the user
/// who sent it.
pub fn to_inbound(msg: &Message) -> InboundMessage {
    let sender = if msg.chat.is_channel() {
        msg.chat.username()
    } else {
        msg.from.as_ref().and_then(|u| u.username.as_deref())
    };

    InboundMessage::builder()
        .sender(sender.map(str::to_lowercase).unwrap_or_default())
        .text(msg.text().or_else(|| msg.caption()).unwrap_or_default())
        .maybe_group_id(msg.media_group_id().map(ToString::to_string))
        .chat(ChatRef {
            id: msg.chat.id.0,
            username: msg.chat.username().map(Into::into),
            title: msg.chat.title().map(Into::into),
        })
        .maybe_media(media(msg))
        .message_id(msg.id.0)
        .build()
}

fn media(msg: &Message) -> Option<Media> {
    if let Some(sizes) = msg.photo() {
        // sizes are sorted from small to big
        return sizes.last().map(|p| Media::Photo(p.file.id.to_string()));
    }
    if let Some(video) = msg.video() {
        return Some(Media::VideoDocument(video.file.id.to_string()));
    }
    if let Some(doc) = msg.document() {
        return Some(Media::from_document(
            doc.mime_type.as_ref().map(|m| m.essence_str()),
            doc.file.id.to_string(),
        ));
    }
    let other = msg.animation().is_some()
        || msg.audio().is_some()
        || msg.voice().is_some()
        || msg.sticker().is_some()
        || msg.video_note().is_some();
    other.then_some(Media::Other)
}
