//! Communication channels (WhatsApp via Twilio).
//!
//! Inbound messages arrive through the gateway webhook; replies go out through a
//! [`MessageSender`] so the dispatcher never touches the provider API directly.

mod inbound;
mod sender;
mod whatsapp;

pub use inbound::InboundMessage;
pub use sender::{MessageSender, SendError};
pub use whatsapp::{strip_transport_prefix, with_transport_prefix, TwilioWhatsApp, TRANSPORT_PREFIX};
