use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use thiserror::Error;

/// Environment file loaded when none is named explicitly.
pub const DEFAULT_ENV_FILE: &str = "config.env";

const DEFAULT_API_PORT: u16 = 8080;
const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Process configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_port: u16,
    pub db_host: String,
    pub db_port: u16,
    pub db_user: Option<String>,
    pub db_password: String,
    pub db_name: Option<String>,
    pub acquire_timeout: Duration,
}

/// Connection parameters for the PostgreSQL store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub acquire_timeout: Duration,
}

/// Which wallet store the process talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite { path: String, acquire_timeout: Duration },
    Postgres(DatabaseConfig),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Ok(Self {
            api_port: parse_or("API_PORT", get("API_PORT"), DEFAULT_API_PORT)?,
            db_host: get("HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            db_port: parse_or("DB_PORT", get("DB_PORT"), DEFAULT_DB_PORT)?,
            db_user: get("DB_USER"),
            db_password: get("DB_PASSWORD").unwrap_or_default(),
            db_name: get("DB_NAME"),
            acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                get("DB_ACQUIRE_TIMEOUT_SECS"),
                DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?),
        })
    }

    /// PostgreSQL parameters. User and database name are mandatory.
    pub fn database(&self) -> Result<DatabaseConfig, ConfigError> {
        Ok(DatabaseConfig {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone().ok_or(ConfigError::Missing("DB_USER"))?,
            password: self.db_password.clone(),
            name: self.db_name.clone().ok_or(ConfigError::Missing("DB_NAME"))?,
            acquire_timeout: self.acquire_timeout,
        })
    }

    /// A SQLite path selects the file-backed store; otherwise PostgreSQL.
    pub fn store_backend(&self, sqlite_path: Option<&str>) -> Result<StoreBackend, ConfigError> {
        match sqlite_path {
            Some(path) => Ok(StoreBackend::Sqlite {
                path: path.to_string(),
                acquire_timeout: self.acquire_timeout,
            }),
            None => Ok(StoreBackend::Postgres(self.database()?)),
        }
    }
}

/// Load variables from an env file. A missing default file is ignored; a
/// missing file the user asked for is an error. Variables already present
/// in the environment are not overridden.
pub fn load_env_file(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("Failed to load env file {}", path.display()))?;
        }
        None => {
            if dotenv::from_filename(DEFAULT_ENV_FILE).is_err() {
                tracing::debug!("No {} found, using process environment", DEFAULT_ENV_FILE);
            }
        }
    }
    Ok(())
}

fn parse_or<T: std::str::FromStr>(
    var: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}
