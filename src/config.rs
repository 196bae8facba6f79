use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_SESSION_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
/// Orders carry up to five inline images of 5 MB each, base64-encoded.
pub const DEFAULT_JSON_BODY_LIMIT: usize = 40 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("either ADMIN_PASSWORD_HASH or ADMIN_PASSWORD must be set")]
    MissingAdminPassword,
    #[error("failed to hash ADMIN_PASSWORD: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub json_body_limit: usize,
    /// Directory holding the built admin frontend, served at `/` when set.
    pub frontend_dir: Option<PathBuf>,
    pub auth: AuthConfig,
}

/// Administrator credential and session lifetimes.
#[derive(Clone)]
pub struct AuthConfig {
    pub admin_username: String,
    /// bcrypt hash of the administrator password.
    pub admin_password_hash: String,
    /// HS256 secret used to sign session tokens.
    pub session_secret: String,
    pub session_max_age: Duration,
    pub session_idle_timeout: Duration,
}

impl AppConfig {
    /// Read the configuration from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parse_or("PORT", 8080)?,
            json_body_limit: parse_or("JSON_BODY_LIMIT", DEFAULT_JSON_BODY_LIMIT)?,
            frontend_dir: env::var("FRONTEND_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            auth: AuthConfig::from_env()?,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let admin_password_hash = match env::var("ADMIN_PASSWORD_HASH") {
            Ok(hash) if !hash.trim().is_empty() => hash,
            _ => {
                let password =
                    env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::MissingAdminPassword)?;
                tracing::warn!("ADMIN_PASSWORD_HASH not set, hashing ADMIN_PASSWORD at startup");
                bcrypt::hash(password, bcrypt::DEFAULT_COST)?
            }
        };

        Ok(Self {
            admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password_hash,
            session_secret: required("SESSION_SECRET")?,
            session_max_age: parse_duration_secs("SESSION_MAX_AGE_SECS", DEFAULT_SESSION_MAX_AGE)?,
            session_idle_timeout: parse_duration_secs(
                "SESSION_IDLE_TIMEOUT_SECS",
                DEFAULT_SESSION_IDLE_TIMEOUT,
            )?,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

fn parse_duration_secs(name: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(name, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            value: secs.to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
