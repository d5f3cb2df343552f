//! Gateway: HTTP server for the Twilio WhatsApp webhook.
//!
//! One POST endpoint receives incoming messages; replies go out through the Twilio REST API
//! and the webhook itself is acknowledged with an empty TwiML document.

mod protocol;
mod server;

pub use protocol::{Health, WebhookForm, EMPTY_TWIML_RESPONSE, TWIML_CONTENT_TYPE};
pub use server::{
    router, run_gateway, run_gateway_with_credentials, GatewayState, WebhookError, WEBHOOK_PATH,
};
