//! User configuration settings
//!
//! Layered configuration: environment variables → config file → defaults

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Error, Result};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base branch to preselect; auto-detected (main → master → current
    /// branch) when unset
    pub default_base: Option<String>,

    /// Maximum concurrent git commands
    pub max_concurrent_git: usize,

    /// Enable debug logging
    pub debug: bool,

    /// Log file path (if set, logs to file instead of stderr)
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_base: None,
            max_concurrent_git: 16,
            debug: false,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from all sources
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        let config: Config = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Config::default()))
            // Layer config file if it exists
            .merge(Toml::file(&config_path))
            // Layer environment variables (BSW_DEFAULT_BASE, etc.)
            .merge(Env::prefixed("BSW_"))
            .extract()
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        Ok(config)
    }

    /// Get the configuration file path
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = Self::project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Save current configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|_e| {
                Error::Config(ConfigError::DirectoryCreationFailed(parent.to_path_buf()))
            })?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        std::fs::write(&config_path, toml)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "branch-sweep", "branch-sweep").ok_or_else(|| {
            Error::Config(ConfigError::LoadFailed(
                "Could not determine home directory".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_base, None);
        assert_eq!(config.max_concurrent_git, 16);
        assert!(!config.debug);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.default_base = Some("main".to_string());
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("default_base"));
        assert!(toml.contains("max_concurrent_git"));
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.default_base = Some("trunk".to_string());
        config.max_concurrent_git = 4;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.default_base.as_deref(), Some("trunk"));
        assert_eq!(parsed.max_concurrent_git, 4);
    }
}
