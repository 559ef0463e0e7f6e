use serde::{Deserialize, Serialize};

pub const DEFAULT_PASSWORD_PARAMETER: &str = "/LaurenSettembrino/EMAIL_PASSWORD";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecretsConfig {
    /// Name of the secret holding the SMTP account password.
    #[serde(default = "default_password_parameter")]
    pub password_parameter: String,
    #[serde(flatten)]
    pub provider: SecretProviderConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum SecretProviderConfig {
    Ssm(SsmConfig),
    Env(EnvSecretConfig),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SsmConfig {
    pub region: Option<String>,
}

/// Reads the secret from a process environment variable. Meant for local runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvSecretConfig {
    pub variable: String,
}

fn default_password_parameter() -> String {
    DEFAULT_PASSWORD_PARAMETER.to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            password_parameter: default_password_parameter(),
            provider: SecretProviderConfig::Ssm(SsmConfig::default()),
        }
    }
}
