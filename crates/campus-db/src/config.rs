//! Database configuration from environment variables.
//!
//! Every variable is optional; unset variables fall back to the
//! [`DbConfig::new`] defaults.
//!
//! | Variable                          | Default              |
//! |-----------------------------------|----------------------|
//! | `CAMPUS_DB_PATH`                  | `./campus_coffee.db` |
//! | `CAMPUS_DB_MAX_CONNECTIONS`       | `5`                  |
//! | `CAMPUS_DB_MIN_CONNECTIONS`       | `1`                  |
//! | `CAMPUS_DB_CONNECT_TIMEOUT_SECS`  | `30`                 |
//! | `CAMPUS_DB_RUN_MIGRATIONS`        | `true`               |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::pool::DbConfig;

pub const ENV_DB_PATH: &str = "CAMPUS_DB_PATH";
pub const ENV_MAX_CONNECTIONS: &str = "CAMPUS_DB_MAX_CONNECTIONS";
pub const ENV_MIN_CONNECTIONS: &str = "CAMPUS_DB_MIN_CONNECTIONS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "CAMPUS_DB_CONNECT_TIMEOUT_SECS";
pub const ENV_RUN_MIGRATIONS: &str = "CAMPUS_DB_RUN_MIGRATIONS";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: String, value: String },

    #[error("{max_name} ({max}) must not be lower than {min_name} ({min})")]
    InconsistentPoolSize {
        min_name: &'static str,
        min: u32,
        max_name: &'static str,
        max: u32,
    },
}

impl DbConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = DbConfig::default();

        let path = lookup(ENV_DB_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(Into::into)
            .unwrap_or(defaults.database_path);

        let config = DbConfig::new(path)
            .max_connections(parse_or(&lookup, ENV_MAX_CONNECTIONS, defaults.max_connections)?)
            .min_connections(parse_or(&lookup, ENV_MIN_CONNECTIONS, defaults.min_connections)?)
            .connect_timeout(Duration::from_secs(parse_or(
                &lookup,
                ENV_CONNECT_TIMEOUT_SECS,
                defaults.connect_timeout.as_secs(),
            )?))
            .run_migrations(parse_or(&lookup, ENV_RUN_MIGRATIONS, defaults.run_migrations)?);

        if config.max_connections < config.min_connections {
            return Err(ConfigError::InconsistentPoolSize {
                min_name: ENV_MIN_CONNECTIONS,
                min: config.min_connections,
                max_name: ENV_MAX_CONNECTIONS,
                max: config.max_connections,
            });
        }

        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            value: raw,
        }),
    }
}
