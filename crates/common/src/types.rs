use std::fmt;

/// Transport-side identifier of an uploaded file
pub type FileRef = String;

/// Media attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Photo(FileRef),
    ImageDocument(FileRef),
    VideoDocument(FileRef),
    Other,
}

impl Media {
    /// Classify a document by the class of its MIME type
    pub fn from_document(mime: Option<&str>, file: impl Into<FileRef>) -> Self {
        match mime.and_then(|m| m.split('/').next()) {
            Some(class) if class.eq_ignore_ascii_case("image") => Self::ImageDocument(file.into()),
            Some(class) if class.eq_ignore_ascii_case("video") => Self::VideoDocument(file.into()),
            _ => Self::Other,
        }
    }
    /// Can be reposted to the destination
    pub fn is_publishable(&self) -> bool {
        !matches!(self, Self::Other)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatRef {
    pub id: i64,
    pub username: Option<String>,
    pub title: Option<String>,
}

/// Chat where the responder reads requests and posts replies
///
/// Bot API reaches a user only by numeric id, and `@username` only for public
/// channels and supergroups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponderChat {
    Id(i64),
    Username(String),
}

impl ResponderChat {
    /// `"-100123"` -> id, `"@Name"` -> `name`
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Username(s.trim_start_matches('@').to_lowercase()),
        }
    }
    /// Message from this chat is a reply
    pub fn matches(&self, chat: &ChatRef) -> bool {
        match self {
            Self::Id(id) => chat.id == *id,
            Self::Username(name) => chat
                .username
                .as_deref()
                .is_some_and(|u| u.eq_ignore_ascii_case(name)),
        }
    }
    /// Bot usernames always end with `bot`, and bots never see messages of
    /// other bots
    pub fn is_bot(&self) -> bool {
        matches!(self, Self::Username(name) if name.ends_with("bot"))
    }
}

/// Message received from any peer
#[derive(Debug, Clone, bon::Builder)]
pub struct InboundMessage {
    /// Lowercased username of the sender, empty when unknown
    #[builder(into, default)]
    pub sender: String,
    #[builder(into, default)]
    pub text: String,
    /// Album marker, shared by all messages of one album
    #[builder(into)]
    pub group_id: Option<String>,
    #[builder(default)]
    pub chat: ChatRef,
    pub media: Option<Media>,
    #[builder(default)]
    pub message_id: i32,
}

impl InboundMessage {
    pub fn group_key(&self) -> Option<GroupKey> {
        self.group_id.as_ref().map(|group_id| GroupKey {
            chat_id: self.chat.id,
            group_id: group_id.clone(),
        })
    }
    /// Media which can be reposted
    pub fn publishable_media(&self) -> Option<&Media> {
        self.media.as_ref().filter(|m| m.is_publishable())
    }
}

/// Identity of one in-flight album
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub chat_id: i64,
    pub group_id: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.group_id)
    }
}

/// Composed post ready to publish
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundPost {
    pub text: String,
    pub media: Vec<Media>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_from_document() {
        let table = [
            (Some("image/png"), Media::ImageDocument("f".into())),
            (Some("video/mp4"), Media::VideoDocument("f".into())),
            (Some("IMAGE/jpeg"), Media::ImageDocument("f".into())),
            (Some("application/pdf"), Media::Other),
            (None, Media::Other),
        ];
        for (i, (mime, expected)) in table.into_iter().enumerate() {
            assert_eq!(Media::from_document(mime, "f"), expected, "test table[{i}]");
        }
    }

    #[test]
    fn test_group_key() {
        let msg = InboundMessage::builder()
            .chat(ChatRef {
                id: -100,
                ..Default::default()
            })
            .group_id("g1")
            .build();
        let key = msg.group_key().unwrap();
        assert_eq!(key.to_string(), "-100:g1");

        let single = InboundMessage::builder().build();
        assert!(single.group_key().is_none());
    }

    #[test]
    fn test_responder_chat() {
        let chat = |id, username: Option<&str>| ChatRef {
            id,
            username: username.map(Into::into),
            title: None,
        };
        let table = [
            ("-1001", chat(-1001, None), true),
            ("42", chat(42, Some("someone")), true),
            ("42", chat(43, None), false),
            ("@Replies", chat(-1002, Some("replies")), true),
            ("replies", chat(-1002, Some("Replies")), true),
            ("replies", chat(-1002, None), false),
            ("replies", chat(-1002, Some("other")), false),
        ];
        for (i, (responder, chat, expected)) in table.into_iter().enumerate() {
            let responder = ResponderChat::parse(responder);
            assert_eq!(responder.matches(&chat), expected, "test table[{i}]");
        }

        assert!(ResponderChat::parse("@TranslatorBot").is_bot());
        assert!(!ResponderChat::parse("@translations").is_bot());
        assert!(!ResponderChat::parse("-1001").is_bot());
    }

    #[test]
    fn test_publishable_media() {
        let msg = InboundMessage::builder().media(Media::Other).build();
        assert!(msg.publishable_media().is_none());

        let msg = InboundMessage::builder()
            .media(Media::Photo("p".into()))
            .build();
        assert_eq!(msg.publishable_media(), Some(&Media::Photo("p".into())));
    }
}
