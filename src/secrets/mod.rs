pub mod config;
pub mod error;
pub mod providers;

pub use config::*;
pub use error::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Named-secret lookup. Values come back decrypted.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError>;
    fn name(&self) -> &str;
}

pub type DynSecretProvider = Arc<dyn SecretProvider>;

pub async fn create_provider(
    config: &SecretProviderConfig,
) -> Result<DynSecretProvider, SecretError> {
    match config {
        SecretProviderConfig::Ssm(ssm_config) => Ok(Arc::new(
            providers::ssm::SsmProvider::new(ssm_config).await?,
        )),
        SecretProviderConfig::Env(env_config) => Ok(Arc::new(
            providers::env::EnvProvider::new(env_config.variable.clone()),
        )),
    }
}
