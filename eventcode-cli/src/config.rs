//! User configuration from ~/.eventcode/config.json

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory suggested when saving; defaults to ~/.eventcode/exports
    pub export_dir: Option<PathBuf>,
}

impl Config {
    /// Load the config from `app_dir`; a missing file means defaults
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config in {}", path.display()))
    }

    pub fn export_dir(&self, app_dir: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| app_dir.join("exports"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.export_dir(dir.path()), dir.path().join("exports"));
    }

    #[test]
    fn test_export_dir_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "export_dir": "/data/coded" }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.export_dir(dir.path()), PathBuf::from("/data/coded"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ export_dir: ").unwrap();

        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }
}
