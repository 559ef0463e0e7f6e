pub mod config;
pub mod error;
pub mod providers;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Delivers one composed contact message. Single attempt, no retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, config: &SendConfig) -> Result<(), MailError>;
    fn name(&self) -> &str;
}

pub type DynMailTransport = Arc<dyn MailTransport>;

pub fn create_transport(config: &MailConfig) -> DynMailTransport {
    match config.transport {
        TransportKind::Smtp => Arc::new(providers::smtp::SmtpProvider::new(config)),
        TransportKind::Null => Arc::new(providers::null::NullProvider::new(config)),
    }
}
