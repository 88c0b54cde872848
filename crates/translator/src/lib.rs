//! Translation of texts by an external responder peer
//!
//! Requests are sent as `<token>\n<text>`. Replies are expected in the same
//! order as requests: the first line of a reply is ignored and the rest
//! settles the oldest pending request. If the responder reorders or drops
//! replies, later translations get paired with the wrong requests.
use async_trait::async_trait;

use common::DeliveryError;

pub use correlator::{Translator, TranslatorConfig};
pub use lang::contains_source_script;

mod correlator;
pub mod lang;
mod pending;


/// Text channel to other peers
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn send_text(&self, peer: &str, text: &str) -> Result<(), DeliveryError>;
}
