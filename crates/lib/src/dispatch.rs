//! Reply dispatcher: classify an inbound message body into a canned reply and send it back.
//!
//! Classification is a pure function of the body text; there is no conversation state.
//! Rule order (first match wins): greeting, exact menu keyword, fallback.
//!
//! Any body that merely contains "hi" (e.g. "this", "chip") counts as a greeting and shadows
//! the menu keywords and the fallback. Known quirk of the deployed bot; see DESIGN.md.

use crate::channels::MessageSender;
use std::collections::HashMap;
use std::sync::Arc;

pub const WELCOME_MESSAGE: &str = "🌾 Welcome to Sugee.io! 🌾

We offer:
1. Apply for an Agriculture Loan
2. Customer Support

Reply with 1 or 2 to proceed.";

pub const AGRICULTURE_LOAN_REPLY: &str =
    "🌱 Agriculture Loan: Quick approval, minimal paperwork. Would you like to proceed?";

pub const SUPPORT_REPLY: &str = "🤝 Support & Help: How can we assist you today?";

pub const FALLBACK_REPLY: &str = "❌ Invalid option. Reply with 1 or 2.";

const GREETING_SUBSTRING: &str = "hi";
const GREETINGS: [&str; 2] = ["hi", "hello"];

/// Trim surrounding whitespace and lowercase. No length cap or other sanitization.
pub fn normalize(raw_body: &str) -> String {
    raw_body.trim().to_lowercase()
}

fn is_greeting(normalized: &str) -> bool {
    GREETINGS.contains(&normalized) || normalized.contains(GREETING_SUBSTRING)
}

/// Immutable keyword -> reply mapping plus the welcome and fallback texts.
/// Built once at startup and shared read-only across requests.
#[derive(Debug, Clone)]
pub struct ReplyTable {
    welcome: String,
    fallback: String,
    replies: HashMap<String, String>,
}

impl Default for ReplyTable {
    fn default() -> Self {
        Self::new(
            WELCOME_MESSAGE,
            FALLBACK_REPLY,
            [("1", AGRICULTURE_LOAN_REPLY), ("2", SUPPORT_REPLY)],
        )
    }
}

impl ReplyTable {
    /// Keywords are normalized on insert so lookups stay exact after normalization.
    pub fn new<K, V>(
        welcome: impl Into<String>,
        fallback: impl Into<String>,
        replies: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            welcome: welcome.into(),
            fallback: fallback.into(),
            replies: replies
                .into_iter()
                .map(|(k, v)| (normalize(k.as_ref()), v.into()))
                .collect(),
        }
    }

    /// Pick the reply for a raw message body.
    pub fn classify(&self, raw_body: &str) -> &str {
        let msg = normalize(raw_body);
        if is_greeting(&msg) {
            &self.welcome
        } else if let Some(reply) = self.replies.get(&msg) {
            reply
        } else {
            &self.fallback
        }
    }

    /// Number of menu keywords (greeting and fallback not counted).
    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }
}

/// Classifies inbound bodies and delivers the reply through a [`MessageSender`].
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<ReplyTable>,
    sender: Arc<dyn MessageSender>,
}

impl Dispatcher {
    pub fn new(table: Arc<ReplyTable>, sender: Arc<dyn MessageSender>) -> Self {
        Self { table, sender }
    }

    pub fn table(&self) -> &ReplyTable {
        &self.table
    }

    /// Classify `raw_body`, send the reply to `sender`, and return the reply text.
    /// A failed send is logged and otherwise ignored; it never changes the returned reply.
    pub async fn dispatch(&self, sender: &str, raw_body: &str) -> String {
        let reply = self.table.classify(raw_body).to_string();
        if let Err(e) = self.sender.send_message(sender, &reply).await {
            log::error!(
                "{}: failed to send message to {}: {}",
                self.sender.id(),
                sender,
                e
            );
        }
        reply
    }
}
