use serde::Deserialize;

use crate::error::AuthError;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from the process environment. The signing secret
    /// is mandatory; a service without it cannot issue tokens, so startup
    /// fails instead of deferring the error to the first login.
    pub fn from_env() -> Result<Self, AuthError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| AuthError::Config("DATABASE_URL is not set".into()))?;
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET is not set".into()))?;
        if secret.trim().is_empty() {
            return Err(AuthError::Config("JWT_SECRET is empty".into()));
        }
        let ttl_minutes = std::env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(5);
        Ok(Self {
            database_url,
            jwt: JwtConfig { secret, ttl_minutes },
        })
    }
}
