use crate::Config;
use crate::email::TransportKind;
use crate::env::{EnvSource, REQUIRED_VARS};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StartupCheckError {
    #[error("Required environment variable is not set: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Origin enforcement is on but no origins are allowed")]
    EmptyOriginAllowList,

    #[error("Route path must start with '/': {0}")]
    InvalidRoutePath(String),
}

impl StartupCheckError {
    /// Critical problems make every request fail in the same way, so the
    /// process should not start. Missing variables still produce well-formed
    /// 500 responses.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            StartupCheckError::EmptyOriginAllowList | StartupCheckError::InvalidRoutePath(_)
        )
    }
}

pub fn perform_startup_checks(
    config: &Config,
    env: &dyn EnvSource,
) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    for (var, _) in REQUIRED_VARS {
        if env.non_empty(var).is_some() {
            info!("Environment variable {} is set", var);
        } else {
            warn!("Environment variable {} is not set, sends will fail", var);
            errors.push(StartupCheckError::MissingEnvironmentVariable(
                var.to_string(),
            ));
        }
    }

    if config.cors.allowed_origins.is_empty() {
        if config.cors.enforce_origin {
            error!("No allowed origins configured; every send will be rejected");
            errors.push(StartupCheckError::EmptyOriginAllowList);
        } else {
            warn!("No allowed origins configured; browsers will not see responses");
        }
    } else {
        info!("Allowed origins: {:?}", config.cors.allowed_origins);
    }

    if !config.server.path.starts_with('/') {
        error!("Route path {:?} does not start with '/'", config.server.path);
        errors.push(StartupCheckError::InvalidRoutePath(
            config.server.path.clone(),
        ));
    }

    if config.mail.transport == TransportKind::Null {
        warn!("Null mail transport is configured; messages will only be logged");
    }

    if errors.is_empty() {
        info!("All startup checks passed");
        Ok(())
    } else {
        error!("Startup checks failed with {} errors", errors.len());
        Err(errors)
    }
}
