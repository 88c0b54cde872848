//! Relaying of source channel posts to the destination
use async_trait::async_trait;

use common::{types::OutboundPost, DeliveryError};

pub use album::AlbumAggregator;
pub use forward::{AlbumOutcome, Forwarder, ForwarderConfig};
pub use router::{Route, Router};

mod album;
pub mod caption;
mod forward;
mod router;


/// Sends composed posts to a destination chat
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Send text with at most one media
    async fn send_single(
        &self,
        destination: &str,
        post: &OutboundPost,
    ) -> Result<(), DeliveryError>;
    /// Send all media as one album, captioned with post text
    async fn send_group(
        &self,
        destination: &str,
        post: &OutboundPost,
    ) -> Result<(), DeliveryError>;
}
