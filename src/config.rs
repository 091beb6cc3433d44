//! Application configuration from the environment
//!
//! The OpenWeatherMap API key is read from `OPENWEATHER_API_KEY` (a `.env`
//! file is honored via dotenvy in main). An optional shell origin enables
//! install-time pre-caching of app-shell assets.

use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

/// Application name used for cache/config/log directory paths
pub const APP_NAME: &str = "skycast";

/// Environment variable holding the OpenWeatherMap API key
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

/// Optional environment variable naming the app-shell origin to pre-cache
pub const SHELL_ORIGIN_VAR: &str = "SKYCAST_SHELL_ORIGIN";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API key environment variable is absent or empty
    #[error("{API_KEY_VAR} is not set; get a key at https://openweathermap.org/api and export it or put it in .env")]
    MissingApiKey,
}

/// Environment-derived configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenWeatherMap API key
    pub api_key: String,
    /// Origin whose app shell is pre-cached at install time, if any
    pub shell_origin: Option<String>,
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let shell_origin = std::env::var(SHELL_ORIGIN_VAR)
            .ok()
            .filter(|o| !o.trim().is_empty());

        Ok(Self {
            api_key,
            shell_origin,
        })
    }
}

/// Directory for log files (`~/.local/state` equivalent per platform), if
/// a home directory can be determined
pub fn log_dir() -> Option<PathBuf> {
    let project_dirs = ProjectDirs::from("", "", APP_NAME)?;
    Some(
        project_dirs
            .state_dir()
            .unwrap_or_else(|| project_dirs.data_dir())
            .to_path_buf(),
    )
}
