//! Inbound message from a channel: delivered to the dispatcher for a canned reply.

/// A message received on a channel. Lives only for the duration of one webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Plain sender address (transport prefix already stripped).
    pub sender: String,
    /// Raw message text as received.
    pub body: String,
}
