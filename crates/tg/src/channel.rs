use async_trait::async_trait;
use teloxide::{requests::Requester, Bot};

use common::DeliveryError;
use translator::MessageChannel;

use crate::{recipient, MapDeliveryError};

/// Sends translation requests as plain bot messages
#[derive(Debug, Clone)]
pub struct TgChannel {
    bot: Bot,
}

impl TgChannel {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageChannel for TgChannel {
    async fn send_text(&self, peer: &str, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(recipient(peer), text)
            .await
            .map_delivery_error(peer)
    }
}
