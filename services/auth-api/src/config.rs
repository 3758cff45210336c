//! Configuration for the Auth API service.

use gatehouse_auth_core::AuthConfig;
use std::time::Duration;

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Database URL
    pub database_url: String,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// How often expired sessions are swept from storage
    pub session_sweep_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Database
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let db_max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("DB_MAX_CONNECTIONS"))?;

        // Server port
        let http_port = std::env::var("HTTP_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Token signing secret (minimum 32 bytes, enforced by AuthConfig)
        let token_secret =
            std::env::var("TOKEN_SECRET").map_err(|_| ConfigError::Missing("TOKEN_SECRET"))?;

        let token_issuer =
            std::env::var("TOKEN_ISSUER").unwrap_or_else(|_| "gatehouse".to_string());

        // Token lifetimes (default 15 minute access, 7 day refresh)
        let access_ttl_secs: u64 = std::env::var("ACCESS_TTL_SECS")
            .unwrap_or_else(|_| "900".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("ACCESS_TTL_SECS"))?;

        let refresh_ttl_secs: u64 = std::env::var("REFRESH_TTL_SECS")
            .unwrap_or_else(|_| "604800".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REFRESH_TTL_SECS"))?;

        // Session sweep interval (default 1 hour)
        let session_sweep_interval_secs: u64 = std::env::var("SESSION_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SESSION_SWEEP_INTERVAL_SECS"))?;

        // Build auth config
        let mut auth = AuthConfig::try_new(token_secret, token_issuer)
            .map_err(|e| ConfigError::AuthConfig(e.to_string()))?
            .with_access_ttl(Duration::from_secs(access_ttl_secs))
            .with_refresh_ttl(Duration::from_secs(refresh_ttl_secs));

        // Comma-separated role namespaces that authenticate externally
        if let Ok(federated) = std::env::var("FEDERATED_ROLES") {
            for role in federated.split(',').map(str::trim).filter(|r| !r.is_empty()) {
                auth = auth.with_federated_role(role);
            }
        }

        Ok(Self {
            http_port,
            database_url,
            db_max_connections,
            auth,
            session_sweep_interval: Duration::from_secs(session_sweep_interval_secs),
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Auth config error: {0}")]
    AuthConfig(String),
}
