use thiserror::Error;

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Secret has no value: {0}")]
    EmptyValue(String),

    #[error("AWS SDK error: {0}")]
    AwsError(String),
}
