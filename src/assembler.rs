use serde::Deserialize;
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::email::SendConfig;
use crate::env::{EnvSource, REQUIRED_VARS};
use crate::failure::CodedFailure;
use crate::secrets::SecretProvider;

/// Raw JSON body posted by the contact form.
#[derive(Debug, Default, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Any other keys. Values must still be strings.
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

/// A submission with all four fields present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, CodedFailure> {
    value
        .filter(|value| !value.is_empty())
        .ok_or_else(|| CodedFailure::missing(field))
}

impl ContactSubmission {
    /// Accepts any bytes; a top-level `null` is an empty submission.
    pub fn parse(body: &[u8]) -> Result<Self, CodedFailure> {
        serde_json::from_slice::<Option<Self>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                info!("Rejecting request body: {}", e);
                CodedFailure::bad_request("Unable to unmarshal request body")
            })
    }

    /// Checks name, email, subject, message in that order; the first missing
    /// or empty one is reported.
    pub fn validate(self) -> Result<ValidatedSubmission, CodedFailure> {
        Ok(ValidatedSubmission {
            name: required("name", self.name)?,
            email: required("email", self.email)?,
            subject: required("subject", self.subject)?,
            message: required("message", self.message)?,
        })
    }
}

/// The four deployment settings read at the start of each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub from_address: String,
    pub to_address: String,
    pub smtp_host: String,
    pub smtp_port: String,
}

fn require_var(env: &dyn EnvSource, var: &str, field: &str) -> Result<String, CodedFailure> {
    env.non_empty(var).ok_or_else(|| {
        warn!("Environment variable {} is not set", var);
        CodedFailure::internal(format!("Missing {}", field))
    })
}

impl RelaySettings {
    /// Checks the variables in [`REQUIRED_VARS`] order.
    pub fn from_env(env: &dyn EnvSource) -> Result<Self, CodedFailure> {
        let [from, to, host, port] = REQUIRED_VARS;
        Ok(Self {
            from_address: require_var(env, from.0, from.1)?,
            to_address: require_var(env, to.0, to.1)?,
            smtp_host: require_var(env, host.0, host.1)?,
            smtp_port: require_var(env, port.0, port.1)?,
        })
    }
}

/// Merges environment settings, the request body and the account password
/// into a [`SendConfig`].
///
/// Steps run in a fixed order and the first failure is returned: environment
/// (500), body parsing (400), required fields (400), password lookup (502).
pub async fn assemble_send_config(
    body: &[u8],
    env: &dyn EnvSource,
    secrets: &dyn SecretProvider,
    password_parameter: &str,
) -> Result<SendConfig, CodedFailure> {
    let settings = RelaySettings::from_env(env)?;
    let submission = ContactSubmission::parse(body)?.validate()?;

    let password = secrets
        .get_secret(password_parameter)
        .await
        .map_err(|e| {
            error!("Password lookup via {} failed: {}", secrets.name(), e);
            CodedFailure::bad_gateway("Unable to get email password")
        })?;

    Ok(SendConfig {
        from_address: settings.from_address,
        to_address: settings.to_address,
        smtp_host: settings.smtp_host,
        smtp_port: settings.smtp_port,
        password,
        sender_name: submission.name,
        sender_email: submission.email,
        subject: submission.subject,
        body_text: submission.message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{FROM_ADDRESS_VAR, SMTP_HOST_VAR, SMTP_PORT_VAR, TO_ADDRESS_VAR};
    use crate::secrets::SecretError;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSecret {
        value: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedSecret {
        fn ok(value: &'static str) -> Self {
            Self {
                value: Some(value),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                value: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SecretProvider for FixedSecret {
        async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.value
                .map(str::to_string)
                .ok_or_else(|| SecretError::AwsError(format!("denied: {}", name)))
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn full_env() -> HashMap<String, String> {
        [
            (FROM_ADDRESS_VAR, "dakota@test.com"),
            (TO_ADDRESS_VAR, "owner@test.com"),
            (SMTP_HOST_VAR, "smtp.mail.com"),
            (SMTP_PORT_VAR, "587"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    const BODY: &str = r#"{"name":"Jane","email":"jane@test.com","subject":"Test subject","message":"Test message"}"#;

    #[tokio::test]
    async fn test_assembles_full_config() {
        let secrets = FixedSecret::ok("hunter2");
        let config = assemble_send_config(BODY.as_bytes(), &full_env(), &secrets, "/Site/EMAIL_PASSWORD")
            .await
            .unwrap();

        assert_eq!(
            config,
            SendConfig {
                from_address: "dakota@test.com".to_string(),
                to_address: "owner@test.com".to_string(),
                smtp_host: "smtp.mail.com".to_string(),
                smtp_port: "587".to_string(),
                password: "hunter2".to_string(),
                sender_name: "Jane".to_string(),
                sender_email: "jane@test.com".to_string(),
                subject: "Test subject".to_string(),
                body_text: "Test message".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_env_checked_in_order_before_body() {
        let cases = [
            (FROM_ADDRESS_VAR, "Missing from address"),
            (TO_ADDRESS_VAR, "Missing to address"),
            (SMTP_HOST_VAR, "Missing host"),
            (SMTP_PORT_VAR, "Missing port"),
        ];

        for (var, expected) in cases {
            let mut env = full_env();
            env.remove(var);
            let secrets = FixedSecret::ok("pw");

            // Body is garbage on purpose: the environment wins
            let err = assemble_send_config(b"not json", &env, &secrets, "p")
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.message, expected);
            assert_eq!(secrets.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_first_missing_env_var_reported() {
        let mut env = full_env();
        env.remove(TO_ADDRESS_VAR);
        env.insert(SMTP_PORT_VAR.to_string(), String::new());

        let err = assemble_send_config(BODY.as_bytes(), &env, &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Missing to address");
    }

    #[tokio::test]
    async fn test_unparseable_body() {
        for body in ["{\"test: wut}", "", "\"just a string\"", r#"{"name": 5}"#] {
            let err = assemble_send_config(body.as_bytes(), &full_env(), &FixedSecret::ok("pw"), "p")
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.message, "Unable to unmarshal request body");
        }
    }

    #[tokio::test]
    async fn test_missing_fields_in_order() {
        let err = assemble_send_config(b"{}", &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Missing name");

        let body = r#"{"name":"Jane","email":"","subject":"","message":"hi"}"#;
        let err = assemble_send_config(body.as_bytes(), &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing email");
    }

    #[tokio::test]
    async fn test_null_field_counts_as_missing() {
        let body = r#"{"name":"Jane","email":"jane@test.com","subject":null,"message":"hi"}"#;
        let err = assemble_send_config(body.as_bytes(), &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Missing subject");
    }

    #[tokio::test]
    async fn test_secret_failure_is_bad_gateway() {
        let secrets = FixedSecret::failing();
        let err = assemble_send_config(BODY.as_bytes(), &full_env(), &secrets, "p")
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::BAD_GATEWAY);
        assert_eq!(err.message, "Unable to get email password");
        assert_eq!(secrets.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_body_skips_secret_lookup() {
        let secrets = FixedSecret::ok("pw");
        let _ = assemble_send_config(br#"{"name":"Jane"}"#, &full_env(), &secrets, "p").await;
        assert_eq!(secrets.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_unparseable() {
        let err = assemble_send_config(&[0xff, 0xfe, b'{'], &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Unable to unmarshal request body");
    }

    #[tokio::test]
    async fn test_extra_keys_must_be_strings() {
        let nested = br#"{"name":"J","email":"j@x.y","subject":"s","message":"m","extra":{"n":1}}"#;
        let err = assemble_send_config(nested, &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unable to unmarshal request body");

        let flat = br#"{"name":"J","email":"j@x.y","subject":"s","message":"m","page":"/contact"}"#;
        let config = assemble_send_config(flat, &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap();
        assert_eq!(config.sender_name, "J");
        assert_eq!(config.body_text, "m");
    }

    #[tokio::test]
    async fn test_null_body_is_empty_submission() {
        let secrets = FixedSecret::ok("pw");
        let err = assemble_send_config(b"null", &full_env(), &secrets, "p")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing name");
        assert_eq!(secrets.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_key_is_unparseable() {
        let body = br#"{"name":"A","name":"B","email":"j@x.y","subject":"s","message":"m"}"#;
        let err = assemble_send_config(body, &full_env(), &FixedSecret::ok("pw"), "p")
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Unable to unmarshal request body");
    }
}
