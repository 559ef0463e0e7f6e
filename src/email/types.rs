use lettre::{
    Address, Message,
    message::{Mailbox, header::ContentType},
};
use std::fmt;

use crate::email::{MailConfig, MailError};

/// Everything needed to relay one contact-form submission.
///
/// Only ever built whole by [`crate::assembler::assemble_send_config`].
#[derive(Clone, PartialEq, Eq)]
pub struct SendConfig {
    pub from_address: String,
    pub to_address: String,
    pub smtp_host: String,
    pub smtp_port: String,
    pub password: String,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body_text: String,
}

impl fmt::Debug for SendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendConfig")
            .field("from_address", &self.from_address)
            .field("to_address", &self.to_address)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("password", &"<redacted>")
            .field("sender_name", &self.sender_name)
            .field("sender_email", &self.sender_email)
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address
        .parse()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

pub fn message_text(config: &SendConfig, site_name: &str) -> String {
    format!(
        "New message received from {} via {}:\n\n{}",
        config.sender_name, site_name, config.body_text
    )
}

/// Builds the relayed message. The envelope sender and recipient are taken
/// from the From and To headers.
pub fn compose_message(config: &SendConfig, mail: &MailConfig) -> Result<Message, MailError> {
    let from = Mailbox::new(
        Some(mail.mailbox_name.clone()),
        parse_address(&config.from_address)?,
    );
    let to = Mailbox::new(
        Some(mail.mailbox_name.clone()),
        parse_address(&config.to_address)?,
    );
    let reply_to = Mailbox::new(None, parse_address(&config.sender_email)?);

    let message = Message::builder()
        .from(from)
        .to(to)
        .reply_to(reply_to)
        .subject(config.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(message_text(config, &mail.site_name))?;

    Ok(message)
}
