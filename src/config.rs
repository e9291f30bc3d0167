use std::env;
use std::time::Duration;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("${0} environment variable must be set")]
    Missing(&'static str),
    #[error("${name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Process configuration, read once at startup. A missing required variable is
/// the one fatal error this service allows itself: no requests are being
/// served yet.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub push_gateway: PushGatewayConfig,
}

#[derive(Debug, Clone)]
pub struct PushGatewayConfig {
    pub endpoint: String,
    /// Upper bound on a single gateway call so a hung dependency cannot pin a
    /// request slot.
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require_var("DATABASE_URL")?;

        let port = require_var("PORT")?
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?;

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        let endpoint = require_var("PUSH_GATEWAY_URL")?;

        let timeout_secs = match env::var("PUSH_TIMEOUT_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "PUSH_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_PUSH_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "PUSH_TIMEOUT_SECS",
                reason: "timeout must be at least one second".to_string(),
            });
        }

        Ok(Self {
            database_url,
            host,
            port,
            push_gateway: PushGatewayConfig {
                endpoint,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
