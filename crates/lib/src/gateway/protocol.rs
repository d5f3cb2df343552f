//! Webhook wire types: Twilio form fields in, TwiML acknowledgment out.

use serde::{Deserialize, Serialize};

/// Acknowledgment returned to Twilio for every handled message. The reply itself is sent
/// through the REST API, so the TwiML document carries no verbs.
pub const EMPTY_TWIML_RESPONSE: &str =
    r#"<?xml version="1.0" encoding="UTF-8"?><Response></Response>"#;

pub const TWIML_CONTENT_TYPE: &str = "text/xml";

/// Subset of the Twilio incoming-message form we use. Both fields are required.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "Body")]
    pub body: String,
    #[serde(rename = "From")]
    pub from: String,
}

/// GET / health payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    pub runtime: String,
    pub port: u16,
}
