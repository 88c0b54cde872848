//! Telegram side of the relay
use teloxide::{
    types::{ChatId, Recipient},
    ApiError, RequestError,
};

use common::DeliveryError;

pub use channel::TgChannel;
pub use convert::to_inbound;
pub use dispatch::start_relay_bot;
pub use publisher::TgPublisher;

mod channel;
mod convert;
mod dispatch;
mod publisher;

/// `"-100123"` -> chat id, `"name"` or `"@name"` -> `@name`
pub(crate) fn recipient(peer: &str) -> Recipient {
    match peer.trim().parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(format!("@{}", peer.trim().trim_start_matches('@'))),
    }
}

trait MapDeliveryError {
    fn map_delivery_error(self, peer: &str) -> Result<(), DeliveryError>;
}

impl<R> MapDeliveryError for Result<R, RequestError> {
    fn map_delivery_error(self, peer: &str) -> Result<(), DeliveryError> {
        match self {
            Ok(_) => Ok(()),
            Err(RequestError::Api(ApiError::ChatNotFound)) => {
                Err(DeliveryError::PeerNotFound(peer.to_string()))
            }
            Err(e) => Err(DeliveryError::request(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient() {
        let table = [
            ("-1001234", Recipient::Id(ChatId(-1001234))),
            ("42", Recipient::Id(ChatId(42))),
            ("@news", Recipient::ChannelUsername("@news".to_string())),
            ("news", Recipient::ChannelUsername("@news".to_string())),
            (" news ", Recipient::ChannelUsername("@news".to_string())),
        ];
        for (i, (peer, expected)) in table.into_iter().enumerate() {
            assert_eq!(recipient(peer), expected, "test table[{i}]");
        }
    }

    #[test]
    fn test_map_delivery_error() {
        let ok: Result<u8, RequestError> = Ok(1);
        assert!(ok.map_delivery_error("p").is_ok());

        let not_found: Result<u8, RequestError> = Err(RequestError::Api(ApiError::ChatNotFound));
        assert!(matches!(
            not_found.map_delivery_error("p"),
            Err(DeliveryError::PeerNotFound(p)) if p == "p"
        ));

        let blocked: Result<u8, RequestError> = Err(RequestError::Api(ApiError::BotBlocked));
        assert!(matches!(
            blocked.map_delivery_error("p"),
            Err(DeliveryError::Request(_))
        ));
    }
}
