use std::error::Error as StdError;

/// Failure to deliver something to a peer or destination
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("peer {0} not found")]
    PeerNotFound(String),
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn StdError + Send + Sync>),
    #[error("nothing to send")]
    Empty,
}

impl DeliveryError {
    pub fn request<E>(e: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Request(Box::new(e))
    }
}
