use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::env::{DynEnvSource, ProcessEnv};
use crate::secrets::{SecretError, SecretProvider};

/// Serves every secret from one environment variable, whatever name is
/// asked for.
pub struct EnvProvider {
    variable: String,
    source: DynEnvSource,
}

impl EnvProvider {
    pub fn new(variable: impl Into<String>) -> Self {
        Self::with_source(variable, Arc::new(ProcessEnv))
    }

    pub fn with_source(variable: impl Into<String>, source: DynEnvSource) -> Self {
        Self {
            variable: variable.into(),
            source,
        }
    }
}

#[async_trait]
impl SecretProvider for EnvProvider {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        debug!("Resolving secret {} from ${}", name, self.variable);

        match self.source.var(&self.variable) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(SecretError::EmptyValue(name.to_string())),
            None => Err(SecretError::NotFound(name.to_string())),
        }
    }

    fn name(&self) -> &str {
        "Environment Variable"
    }
}
