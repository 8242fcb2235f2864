use super::defaults::{default_config, get_config_file_path};
use super::{Config, Result};
use std::fs;
use std::path::Path;

pub struct ConfigManager;

impl ConfigManager {
    /// Loads the user's config file, falling back to defaults when none exists.
    /// Unlike a wizard-driven tool, nothing is written on first run.
    pub fn load_or_default() -> Result<Config> {
        Self::load_or_default_with_path(None)
    }

    pub fn load_or_default_with_path(config_path: Option<&Path>) -> Result<Config> {
        let config_path = match config_path {
            Some(path) => path.to_path_buf(),
            None => get_config_file_path(),
        };

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            let config = default_config();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(config)?;
        fs::write(path, json)?;

        Ok(())
    }
}
