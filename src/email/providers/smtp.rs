use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    transport::smtp::authentication::{Credentials, Mechanism},
};
use std::time::Duration;
use tracing::{debug, error};

use crate::email::{MailConfig, MailError, MailTransport, SendConfig, compose_message};

/// Authenticated STARTTLS relay. A fresh session is opened for every send
/// and closed with QUIT afterwards.
pub struct SmtpProvider {
    mail: MailConfig,
}

impl SmtpProvider {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            mail: config.clone(),
        }
    }

    fn build_transport(
        &self,
        config: &SendConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let port: u16 = config
            .smtp_port
            .trim()
            .parse()
            .map_err(|_| MailError::InvalidPort(config.smtp_port.clone()))?;

        // TLS is required and verified against the relay host name
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(port)
            .credentials(Credentials::new(
                config.from_address.clone(),
                config.password.clone(),
            ))
            .authentication(vec![Mechanism::Plain])
            .timeout(Some(Duration::from_secs(self.mail.timeout_seconds)))
            .build();

        Ok(transport)
    }
}

#[async_trait]
impl MailTransport for SmtpProvider {
    async fn send(&self, config: &SendConfig) -> Result<(), MailError> {
        debug!(
            "Relaying contact message via {}:{} to {}",
            config.smtp_host, config.smtp_port, config.to_address
        );

        let message = compose_message(config, &self.mail)?;
        let transport = self.build_transport(config)?;

        match transport.send(message).await {
            Ok(response) => {
                debug!("SMTP relay accepted message: {:?}", response.code());
                Ok(())
            }
            Err(e) => {
                error!("Failed to send email via SMTP: {}", e);
                Err(MailError::Smtp(e))
            }
        }
    }

    fn name(&self) -> &str {
        "SMTP"
    }
}
