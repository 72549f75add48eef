//! Process configuration, read once at startup from the environment (a
//! `.env` file is honoured). Secrets are handed to the components that need
//! them; nothing else reads the environment.

use chrono::TimeDelta;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Used when `JWT_SECRET` is not set. Anyone who knows it can mint tokens.
pub const DEFAULT_JWT_SECRET: &str = "clave_secreta_app_salud_2024";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            key: "HOST",
            value: raw,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    /// Upper bound for a single database call and for pool acquisition.
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub using_default_secret: bool,
    pub token_ttl: TimeDelta,
    pub bcrypt_cost: u32,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("using_default_secret", &self.using_default_secret)
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sliding inactivity window.
    pub ttl: TimeDelta,
    pub secure_cookie: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            ttl: TimeDelta::hours(24),
            secure_cookie: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub filter: String,
    pub json: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").filter(|s| !s.is_empty());
        let using_default_secret = jwt_secret.is_none();

        let log_json = match lookup("LOG_FORMAT").as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                })
            }
        };

        Ok(Config {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", 3000)?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
                timeout: Duration::from_secs(parse_or(&lookup, "DB_TIMEOUT_SECS", 5)?),
            },
            auth: AuthConfig {
                jwt_secret: jwt_secret.unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string()),
                using_default_secret,
                token_ttl: hours(&lookup, "TOKEN_TTL_HOURS", 24)?,
                bcrypt_cost: bcrypt_cost(&lookup)?,
            },
            session: SessionConfig {
                ttl: hours(&lookup, "SESSION_TTL_HOURS", 24)?,
                secure_cookie: parse_or(&lookup, "SESSION_SECURE", false)?,
            },
            log: LogConfig {
                filter: lookup("RUST_LOG")
                    .unwrap_or_else(|| "app_salud=info,tower_http=info".to_string()),
                json: log_json,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn hours<F>(lookup: &F, key: &'static str, default: i64) -> Result<TimeDelta, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value: i64 = parse_or(lookup, key, default)?;
    TimeDelta::try_hours(value)
        .filter(|ttl| *ttl > TimeDelta::zero())
        .ok_or(ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
}

/// bcrypt only accepts work factors 4 through 31.
fn bcrypt_cost<F>(lookup: &F) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let cost: u32 = parse_or(lookup, "BCRYPT_COST", 10)?;
    if (4..=31).contains(&cost) {
        Ok(cost)
    } else {
        Err(ConfigError::Invalid {
            key: "BCRYPT_COST",
            value: cost.to_string(),
        })
    }
}
