use crate::email::{MailConfig, MailError, MailTransport, SendConfig, compose_message, message_text};
use async_trait::async_trait;
use tracing::info;

pub struct NullProvider {
    mail: MailConfig,
}

impl NullProvider {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            mail: config.clone(),
        }
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new(&MailConfig::default())
    }
}

#[async_trait]
impl MailTransport for NullProvider {
    async fn send(&self, config: &SendConfig) -> Result<(), MailError> {
        // Compose anyway so bad addresses fail the same way as with SMTP
        compose_message(config, &self.mail)?;

        let body = message_text(config, &self.mail.site_name);
        let body_preview = body.chars().take(200).collect::<String>();

        info!(
            "NULL MAIL TRANSPORT - Would send email:\n\
             From: {}\n\
             To: {}\n\
             Reply-To: {}\n\
             Subject: {}\n\
             Body (first 200 chars): {}{}",
            config.from_address,
            config.to_address,
            config.sender_email,
            config.subject,
            body_preview,
            if body.chars().count() > 200 { "..." } else { "" }
        );

        tracing::debug!(
            "NULL MAIL TRANSPORT - Full message via {}:{}:\n{}",
            config.smtp_host,
            config.smtp_port,
            body
        );

        Ok(())
    }

    fn name(&self) -> &str {
        "Null Mail Transport (Logging Only)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SendConfig {
        SendConfig {
            from_address: "sender@example.com".to_string(),
            to_address: "owner@example.com".to_string(),
            smtp_host: "localhost".to_string(),
            smtp_port: "25".to_string(),
            password: "secret".to_string(),
            sender_name: "Jane".to_string(),
            sender_email: "reply@example.com".to_string(),
            subject: "Test Subject".to_string(),
            body_text: "Test body content".to_string(),
        }
    }

    #[tokio::test]
    async fn test_null_provider_send() {
        let provider = NullProvider::default();
        assert!(provider.send(&config()).await.is_ok());
    }

    #[tokio::test]
    async fn test_null_provider_long_body() {
        let provider = NullProvider::default();
        let mut config = config();
        config.body_text = "x".repeat(1000);

        assert!(provider.send(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_null_provider_rejects_bad_address() {
        let provider = NullProvider::default();
        let mut config = config();
        config.sender_email = "@@".to_string();

        assert!(provider.send(&config).await.is_err());
    }

    #[test]
    fn test_null_provider_name() {
        let provider = NullProvider::default();
        assert_eq!(provider.name(), "Null Mail Transport (Logging Only)");
    }
}
