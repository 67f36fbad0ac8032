use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_BASE_URL;

/// User configuration, read from `~/.tankobon/config.yaml`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Config {
        let path = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tankobon")
            .join("config.yaml");

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "using default config");
                Config::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        // A trailing slash would produce double slashes in endpoint paths.
        while config.base_url.ends_with('/') {
            config.base_url.pop();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "base_url: http://catalog.local:9000\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://catalog.local:9000");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "base_url: http://catalog.local:9000/\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "http://catalog.local:9000");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("nope.yaml")).is_err());
    }

    #[test]
    fn test_empty_mapping_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "{}\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
