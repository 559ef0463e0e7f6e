use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ssm::{Client, config::Region, error::DisplayErrorContext};
use tracing::{debug, error};

use crate::secrets::{SecretError, SecretProvider, SsmConfig};

/// AWS Systems Manager Parameter Store.
pub struct SsmProvider {
    client: Client,
}

impl SsmProvider {
    pub async fn new(config: &SsmConfig) -> Result<Self, SecretError> {
        let mut aws_config_builder = aws_config::defaults(BehaviorVersion::latest());

        // Region falls back to the environment / profile chain
        if let Some(region) = &config.region {
            aws_config_builder = aws_config_builder.region(Region::new(region.clone()));
        }

        let aws_config = aws_config_builder.load().await;
        let client = Client::new(&aws_config);

        Ok(Self { client })
    }
}

#[async_trait]
impl SecretProvider for SsmProvider {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        debug!("Fetching parameter {} from SSM", name);

        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error()
                    .is_some_and(|service_error| service_error.is_parameter_not_found())
                {
                    SecretError::NotFound(name.to_string())
                } else {
                    error!("Failed to get parameter via SSM: {}", DisplayErrorContext(&e));
                    SecretError::AwsError(DisplayErrorContext(&e).to_string())
                }
            })?;

        output
            .parameter()
            .and_then(|parameter| parameter.value())
            .map(str::to_string)
            .ok_or_else(|| SecretError::EmptyValue(name.to_string()))
    }

    fn name(&self) -> &str {
        "AWS SSM Parameter Store"
    }
}
