use crate::domain::{config::MemCliConfig, error::{MemCliError, MemCliResult}};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> MemCliResult<Self> {
        Ok(Self {
            global_config_path: Self::get_global_config_path()?,
        })
    }

    /// Manager reading from an explicit default location
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: path.into(),
        }
    }

    /// Load the default configuration file, falling back to defaults if absent
    pub fn load_config(&self) -> MemCliResult<MemCliConfig> {
        if self.global_config_path.exists() {
            Self::load_config_from_path(&self.global_config_path)
        } else {
            tracing::debug!(path = %self.global_config_path.display(), "no config file, using defaults");
            Ok(MemCliConfig::default())
        }
    }

    /// Load configuration from specific path; the file must exist
    pub fn load_config_from_path(path: &Path) -> MemCliResult<MemCliConfig> {
        let content = fs::read_to_string(path).map_err(|e| MemCliError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| MemCliError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> MemCliResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| MemCliError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("memcli").join("config.toml"))
    }

    /// Get the global config path
    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_path_location() {
        if let Ok(manager) = ConfigManager::new() {
            assert!(manager
                .get_global_config_path_ref()
                .ends_with(".config/memcli/config.toml"));
        }
    }

    #[test]
    fn test_missing_default_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let config = manager.load_config().unwrap();

        assert_eq!(config.global.log_level, "warn");
        assert_eq!(config.global.output, "text");
        assert!(config.credentials.username.is_none());
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("memcli.toml");
        fs::write(
            &path,
            "[global]\napi_url = \"http://localhost:9000\"\n\n[credentials]\nusername = \"teacher\"\npassword = \"pw\"\n",
        )
        .unwrap();

        let config = ConfigManager::load_config_from_path(&path).unwrap();
        assert_eq!(config.global.api_url, "http://localhost:9000");
        assert_eq!(config.credentials.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigManager::load_config_from_path(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[global\noutput = ").unwrap();

        let manager = ConfigManager::with_path(&path);
        let err = manager.load_config().unwrap_err();
        assert!(err.to_string().starts_with("Configuration error: Failed to parse config file"));
    }
}
