//! Outbound side of a channel: deliver a text message to an address.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("send request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("send api error: {0}")]
    Api(String),
}

/// Capability to send a text message to a plain address on a channel.
/// Failures are returned as values; callers decide whether to log or escalate.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Channel id (e.g. "whatsapp").
    fn id(&self) -> &str;
    /// Send `body` to `to` (plain address, no transport prefix).
    async fn send_message(&self, to: &str, body: &str) -> Result<(), SendError>;
}
