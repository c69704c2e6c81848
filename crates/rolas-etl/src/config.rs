use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for rolas.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (ROLAS_* prefix)
/// 3. Config file (~/.config/rolas/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite catalog.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: ROLAS_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/rolas/rolas.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Directory mined when `rolas mine` gets no path.
    ///
    /// Default: ~/Música when it exists, otherwise ~/Music
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    /// File extensions treated as audio, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Logger settings handed to twyg.
    #[serde(default)]
    pub logging: twyg::Opts,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            music_dir: default_music_dir(),
            extensions: default_extensions(),
            logging: twyg::Opts::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/rolas/config.toml
    /// Reads environment variables with ROLAS_ prefix.
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

        let env_opts = env::Options::with_top_level("rolas");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration, letting CLI flags override the loaded values.
    pub fn load_with_overrides(db_path: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::load()?;
        if let Some(db_path) = db_path {
            config.database_path = db_path;
        }
        Ok(config)
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/rolas/rolas.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rolas")
        .join("rolas.db")
}

fn default_music_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let musica = home.join("Música");
    if musica.exists() {
        musica
    } else {
        dirs::audio_dir().unwrap_or_else(|| home.join("Music"))
    }
}

fn default_extensions() -> Vec<String> {
    vec!["mp3".to_string()]
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/rolas/config.toml
/// - macOS: ~/Library/Application Support/rolas/config.toml
/// - Windows: %APPDATA%\rolas\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rolas")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Rolas Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (ROLAS_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite catalog
#
# Can also be set via:
# - CLI: rolas --db /custom/path.db mine
# - Environment: ROLAS_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/rolas.db"

# Directory scanned by `rolas mine` when no path is given
#
# Default: ~/Música if it exists, otherwise ~/Music
#music_dir = "/path/to/music"

# Extensions treated as audio files (case-insensitive, no leading dot)
extensions = ["mp3"]
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert!(config.database_path.ends_with("rolas/rolas.db"));
        assert_eq!(config.extensions, vec!["mp3".to_string()]);
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/test.db");
        let config = Config::load_with_overrides(Some(custom_path.clone()));
        assert!(config.is_ok());
        assert_eq!(config.unwrap().database_path, custom_path);
    }

    #[test]
    fn test_example_config_mentions_every_key() {
        let example = example_config();
        for key in ["database_path", "music_dir", "extensions"] {
            assert!(example.contains(key), "missing {key}");
        }
    }
}
