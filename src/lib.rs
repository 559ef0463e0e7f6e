use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub mod assembler;
pub mod cors;
pub mod email;
pub mod env;
pub mod failure;
pub mod handlers;
pub mod secrets;
pub mod startup_checks;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = [
    "https://laurensettembrino.com",
    "https://www.laurensettembrino.com",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub mail: email::MailConfig,
    #[serde(default)]
    pub secrets: secrets::SecretsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Route carrying both the POST and OPTIONS handlers.
    pub path: String,
    /// Largest request body read by the send handler.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    /// Reject sends whose origin is not allow-listed (403) instead of
    /// relaying them anyway.
    pub enforce_origin: bool,
    pub max_age_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            path: "/send-email".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "Formrelay".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
            enforce_origin: true,
            max_age_seconds: 300,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml_edit::de::Error),
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml_edit::de::from_str::<Config>(content)?)
    }

    /// Loads `path`, or the defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config_content = std::fs::read_to_string(path)?;
            Self::from_toml(&config_content)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Config::default())
        }
    }
}

use axum::{Router, routing::MethodRouter};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub env: env::DynEnvSource,
    pub secrets: secrets::DynSecretProvider,
    pub transport: email::DynMailTransport,
}

impl AppState {
    /// Production wiring: process environment, configured secret provider and
    /// mail transport.
    pub async fn from_config(config: Config) -> Result<Self, secrets::SecretError> {
        let secrets = secrets::create_provider(&config.secrets.provider).await?;
        let transport = email::create_transport(&config.mail);

        tracing::info!(
            "Using secret provider '{}' and mail transport '{}'",
            secrets.name(),
            transport.name()
        );

        Ok(Self {
            config,
            env: Arc::new(env::ProcessEnv),
            secrets,
            transport,
        })
    }
}

fn send_routes() -> MethodRouter<AppState> {
    axum::routing::post(handlers::send_email_handler).options(handlers::preflight_handler)
}

/// Router for the standalone server: handlers live on `server.path` only.
pub fn create_app(app_state: AppState) -> Router {
    let path = app_state.config.server.path.clone();

    with_access_log(Router::new().route(&path, send_routes())).with_state(app_state)
}

/// Router for the Lambda event source. API Gateway already selected this
/// function, and the path may carry a stage prefix, so every path is routed
/// by method alone.
pub fn create_lambda_app(app_state: AppState) -> Router {
    with_access_log(Router::new().fallback(send_routes())).with_state(app_state)
}

fn with_access_log(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                let method = request.method();
                let uri = request.uri();

                tracing::info_span!("http_request", method = %method, uri = %uri)
            })
            .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                let origin = request
                    .headers()
                    .get("origin")
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or("-");

                tracing::info!(
                    target: "access_log",
                    method = %request.method(),
                    path = %request.uri().path(),
                    origin = %origin,
                    "request"
                );
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    tracing::info!(
                        target: "access_log",
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            ),
    )
}
