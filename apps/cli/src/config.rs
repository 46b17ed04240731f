//! # Configuration
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`HISTOPEDIA_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! - `HISTOPEDIA_DB_PATH`: SQLite file (default: platform data dir)
//! - `HISTOPEDIA_LOAN_DAYS`: loan length in days (default: 7)
//! - `HISTOPEDIA_LIBRARY_NAME`: name shown in menu banners
//!
//! Configuration is read-only after startup.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use histopedia_core::DEFAULT_LOAN_DAYS;

/// Default library name shown in banners.
pub const DEFAULT_LIBRARY_NAME: &str = "Histopedia";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Days until a new loan is due.
    pub loan_days: i64,

    /// Name shown in menu banners ("Welcome to Histopedia!").
    pub library_name: String,
}

impl AppConfig {
    /// Loads configuration from `HISTOPEDIA_*` environment variables.
    ///
    /// ## Errors
    /// * `ConfigError::InvalidValue` - a variable is set but unusable
    /// * `ConfigError::NoDataDir` - no override and no home directory
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_path = match lookup("HISTOPEDIA_DB_PATH") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::InvalidValue("HISTOPEDIA_DB_PATH".to_string()))
            }
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let loan_days = match lookup("HISTOPEDIA_LOAN_DAYS") {
            Some(days) => days
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|d| (1..=365).contains(d))
                .ok_or_else(|| ConfigError::InvalidValue("HISTOPEDIA_LOAN_DAYS".to_string()))?,
            None => DEFAULT_LOAN_DAYS,
        };

        let library_name = lookup("HISTOPEDIA_LIBRARY_NAME")
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_LIBRARY_NAME.to_string());

        Ok(AppConfig {
            database_path,
            loan_days,
            library_name,
        })
    }

    /// Configuration for a given database file with every other value at
    /// its default.
    pub fn with_database(path: impl Into<PathBuf>) -> Self {
        AppConfig {
            database_path: path.into(),
            loan_days: DEFAULT_LOAN_DAYS,
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
        }
    }
}

/// Platform-specific database location.
///
/// - **Linux**: `~/.local/share/histopedia/histopedia.db`
/// - **macOS**: `~/Library/Application Support/org.histopedia.histopedia/histopedia.db`
/// - **Windows**: `%APPDATA%\histopedia\histopedia\data\histopedia.db`
fn default_database_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("org", "histopedia", "histopedia").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("histopedia.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine app data directory; set HISTOPEDIA_DB_PATH")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HISTOPEDIA_DB_PATH", "/tmp/lib.db"),
            ("HISTOPEDIA_LOAN_DAYS", "14"),
            ("HISTOPEDIA_LIBRARY_NAME", "Alexandria"),
        ]))
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/lib.db"));
        assert_eq!(config.loan_days, 14);
        assert_eq!(config.library_name, "Alexandria");
    }

    #[test]
    fn test_defaults_with_explicit_path() {
        let config =
            AppConfig::from_lookup(lookup(&[("HISTOPEDIA_DB_PATH", "/tmp/lib.db")])).unwrap();

        assert_eq!(config.loan_days, DEFAULT_LOAN_DAYS);
        assert_eq!(config.library_name, DEFAULT_LIBRARY_NAME);
        assert_eq!(config, AppConfig::with_database("/tmp/lib.db"));
    }

    #[test]
    fn test_invalid_loan_days() {
        for bad in ["seven", "0", "-3", "1000"] {
            let err = AppConfig::from_lookup(lookup(&[
                ("HISTOPEDIA_DB_PATH", "/tmp/lib.db"),
                ("HISTOPEDIA_LOAN_DAYS", bad),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(ref v) if v == "HISTOPEDIA_LOAN_DAYS"));
        }
    }

    #[test]
    fn test_blank_db_path_is_invalid() {
        let err = AppConfig::from_lookup(lookup(&[("HISTOPEDIA_DB_PATH", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }
}
