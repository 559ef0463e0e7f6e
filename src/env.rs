use std::collections::HashMap;
use std::sync::Arc;

pub const FROM_ADDRESS_VAR: &str = "FROM_ADDRESS";
pub const TO_ADDRESS_VAR: &str = "TO_ADDRESS";
pub const SMTP_HOST_VAR: &str = "SMTP_HOST";
pub const SMTP_PORT_VAR: &str = "SMTP_PORT";

/// Required variables paired with the field name used in "Missing <field>"
/// messages, in the order they are checked.
pub const REQUIRED_VARS: [(&str, &str); 4] = [
    (FROM_ADDRESS_VAR, "from address"),
    (TO_ADDRESS_VAR, "to address"),
    (SMTP_HOST_VAR, "host"),
    (SMTP_PORT_VAR, "port"),
];

/// Source of deployment settings that are read fresh on every request.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Like `var`, but an empty value counts as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

pub type DynEnvSource = Arc<dyn EnvSource>;

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_unset() {
        let mut env = HashMap::new();
        env.insert(SMTP_HOST_VAR.to_string(), String::new());
        env.insert(SMTP_PORT_VAR.to_string(), "587".to_string());

        assert_eq!(env.var(SMTP_HOST_VAR), Some(String::new()));
        assert_eq!(env.non_empty(SMTP_HOST_VAR), None);
        assert_eq!(env.non_empty(SMTP_PORT_VAR), Some("587".to_string()));
        assert_eq!(env.non_empty(FROM_ADDRESS_VAR), None);
    }
}
