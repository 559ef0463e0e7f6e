use lettre::address::AddressError;
use thiserror::Error;

use crate::failure::CodedFailure;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid email address {address}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("Invalid SMTP port: {0}")]
    InvalidPort(String),

    #[error(transparent)]
    Message(#[from] lettre::error::Error),

    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
}

impl From<MailError> for CodedFailure {
    fn from(error: MailError) -> Self {
        CodedFailure::bad_gateway(error.to_string())
    }
}
