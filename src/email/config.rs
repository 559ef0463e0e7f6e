use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// Site named in the body preamble.
    pub site_name: String,
    /// Display name put on both the From and To mailboxes.
    pub mailbox_name: String,
    pub transport: TransportKind,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Smtp,
    /// Log the message instead of sending it.
    Null,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            site_name: "laurensettembrino.com".to_string(),
            mailbox_name: "Lauren Settembrino".to_string(),
            transport: TransportKind::Smtp,
            timeout_seconds: 30,
        }
    }
}
