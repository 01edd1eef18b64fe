use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_pool_size: u32,
    pub database_acquire_timeout_secs: u64,
    pub port: u16,
    /// Access token lifetime in seconds.
    pub jwt_expiry_secs: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        Ok(Self {
            database_url,
            database_pool_size: env_or("DATABASE_POOL_SIZE", 10),
            database_acquire_timeout_secs: env_or("DATABASE_ACQUIRE_TIMEOUT_SECS", 5),
            port: env_or("PORT", 8080),
            jwt_expiry_secs: env_or("JWT_EXPIRY_SECS", 3600),
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
