//! Core configuration and reserved identities.
//!
//! # Responsibility
//! - Own the reserved administrative account name.
//! - Resolve runtime settings (database path, logging) from the environment.
//!
//! # Invariants
//! - `ADMIN_NAME` is the only name granted the administrator role.
//! - Resolved settings are validated before any storage is opened.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Reserved name of the administrative account.
pub const ADMIN_NAME: &str = "admin";
/// Password given to the administrative account when bootstrap creates it.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";
/// Database file used when `MYTASKS_DB_PATH` is not set.
pub const DEFAULT_DB_FILE_NAME: &str = "mytasks.sqlite3";

pub const ENV_DB_PATH: &str = "MYTASKS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MYTASKS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MYTASKS_LOG_DIR";
pub const ENV_ADMIN_PASSWORD: &str = "MYTASKS_ADMIN_PASSWORD";

/// Runtime settings for one core process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    /// Password for the administrative account if bootstrap must create it.
    pub admin_password: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl CoreConfig {
    /// Builds settings from `MYTASKS_*` environment variables.
    ///
    /// Unset or blank variables fall back to [`CoreConfig::default`].
    ///
    /// # Errors
    /// - Returns `ConfigError` when a provided value fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(password) = lookup(ENV_ADMIN_PASSWORD) {
            config.admin_password = password;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admin_password.is_empty() {
            return Err(ConfigError::EmptyAdminPassword);
        }
        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyAdminPassword,
    RelativeLogDir(PathBuf),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyAdminPassword => write!(f, "{ENV_ADMIN_PASSWORD} must not be empty"),
            Self::RelativeLogDir(dir) => write!(
                f,
                "{ENV_LOG_DIR} must be an absolute path, got `{}`",
                dir.display()
            ),
        }
    }
}

impl Error for ConfigError {}
