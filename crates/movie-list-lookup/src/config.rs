use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for movie-list.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (MOVIELIST_* prefix)
/// 3. Config file (~/.config/movie-list/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: MOVIELIST_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/movie-list/movie-list.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// OMDb API key. Enables the primary (IMDb-backed) lookup provider.
    ///
    /// Can be set via:
    /// - ENV: MOVIELIST_OMDB_API_KEY
    /// - Config: omdb_api_key = "..."
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    /// TMDb API key. Enables the secondary lookup provider.
    ///
    /// Can be set via:
    /// - ENV: MOVIELIST_TMDB_API_KEY
    /// - Config: tmdb_api_key = "..."
    #[serde(default)]
    pub tmdb_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            omdb_api_key: None,
            tmdb_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/movie-list/config.toml
    /// Reads environment variables with MOVIELIST_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("movielist");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?;

        log::debug!(
            "Loaded configuration (database: {})",
            config.database_path.display()
        );
        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/movie-list/movie-list.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("movie-list")
        .join("movie-list.db")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/movie-list/config.toml
/// - macOS: ~/Library/Application Support/movie-list/config.toml
/// - Windows: %APPDATA%\movie-list\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("movie-list")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.database_path.ends_with("movie-list.db"));
        assert!(config.omdb_api_key.is_none());
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/movie-list-test.db");
        let config = Config::load_with_db_path(custom_path.clone()).unwrap();
        assert_eq!(config.database_path, custom_path);
    }

    #[test]
    fn test_config_file_path_location() {
        let path = config_file_path();
        assert!(path.ends_with("movie-list/config.toml"));
    }
}
