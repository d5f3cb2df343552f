//! WhatsApp channel: send replies through the Twilio Messages API.

use crate::channels::sender::{MessageSender, SendError};
use crate::config::TwilioCredentials;
use async_trait::async_trait;
use std::time::Duration;

const TWILIO_API_BASE: &str = "https://api.twilio.com";
const SEND_TIMEOUT: Duration = Duration::from_secs(15);

/// Tag Twilio puts in front of WhatsApp addresses (`whatsapp:+15551234567`).
pub const TRANSPORT_PREFIX: &str = "whatsapp:";

/// Remove the transport prefix from a provider address. Every occurrence is removed, not just a leading one.
pub fn strip_transport_prefix(address: &str) -> String {
    address.replace(TRANSPORT_PREFIX, "")
}

/// Prepend the transport prefix to a plain address.
pub fn with_transport_prefix(address: &str) -> String {
    format!("{}{}", TRANSPORT_PREFIX, address)
}

/// WhatsApp sender backed by Twilio: POST /2010-04-01/Accounts/{sid}/Messages.json with basic auth.
pub struct TwilioWhatsApp {
    id: String,
    credentials: TwilioCredentials,
    api_base: String,
    client: reqwest::Client,
}

impl TwilioWhatsApp {
    /// `api_base` overrides https://api.twilio.com (tests, proxies).
    pub fn new(credentials: TwilioCredentials, api_base: Option<String>) -> Result<Self, SendError> {
        let api_base = api_base
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| TWILIO_API_BASE.to_string());
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            id: "whatsapp".to_string(),
            credentials,
            api_base,
            client,
        })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.credentials.account_sid
        )
    }

    /// Send a text message from the configured number to `to` (plain address).
    pub async fn send_message(&self, to: &str, body: &str) -> Result<(), SendError> {
        let from = with_transport_prefix(&self.credentials.number);
        let to_addr = with_transport_prefix(to);
        let form = [("From", from.as_str()), ("To", to_addr.as_str()), ("Body", body)];
        let res = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&form)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(SendError::Api(format!("{} {}", status, body)));
        }
        log::info!("message sent to {}: {}", to, body);
        Ok(())
    }
}

#[async_trait]
impl MessageSender for TwilioWhatsApp {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_message(&self, to: &str, body: &str) -> Result<(), SendError> {
        TwilioWhatsApp::send_message(self, to, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> TwilioCredentials {
        TwilioCredentials {
            number: "+14155238886".to_string(),
            account_sid: "AC0001".to_string(),
            auth_token: "token".to_string(),
        }
    }

    #[test]
    fn strips_prefix_from_sender() {
        assert_eq!(strip_transport_prefix("whatsapp:+15551234567"), "+15551234567");
        assert_eq!(strip_transport_prefix("+15551234567"), "+15551234567");
        assert_eq!(strip_transport_prefix("whatsapp:whatsapp:+1"), "+1");
    }

    #[test]
    fn adds_prefix_for_outbound() {
        assert_eq!(with_transport_prefix("+15551234567"), "whatsapp:+15551234567");
    }

    #[test]
    fn messages_url_uses_account_sid_and_default_base() {
        let ch = TwilioWhatsApp::new(creds(), None).unwrap();
        assert_eq!(
            ch.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC0001/Messages.json"
        );
        assert_eq!(MessageSender::id(&ch), "whatsapp");
    }

    #[test]
    fn api_base_override_trims_trailing_slash() {
        let ch = TwilioWhatsApp::new(creds(), Some("http://127.0.0.1:9999/".to_string())).unwrap();
        assert_eq!(
            ch.messages_url(),
            "http://127.0.0.1:9999/2010-04-01/Accounts/AC0001/Messages.json"
        );
    }
}
