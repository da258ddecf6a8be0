//! Client configuration
//!
//! Resolution order: built-in defaults, then `<config_dir>/epiboard/config.toml`,
//! then environment variables. CLI flags are applied by the binary on top.

use crate::error::CoreError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ENV_API_ROOT: &str = "EPIBOARD_API_ROOT";
pub const ENV_STATE_DIR: &str = "EPIBOARD_STATE_DIR";
pub const CONFIG_FILE: &str = "config.toml";

/// Path prefix of every backend endpoint
pub const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:8000`
    pub api_root: String,
    /// Directory holding `state.json`
    pub state_dir: PathBuf,
    pub dashboard_refresh: Duration,
    pub metrics_refresh: Duration,
    pub top_limit: u32,
    pub trend_days: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_root: "http://localhost:8000".to_string(),
            state_dir: default_config_dir().unwrap_or_else(|| PathBuf::from(".epiboard")),
            dashboard_refresh: Duration::from_secs(5 * 60),
            metrics_refresh: Duration::from_secs(60),
            top_limit: 10,
            trend_days: 30,
        }
    }
}

/// On-disk shape; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_root: Option<String>,
    state_dir: Option<PathBuf>,
    dashboard_refresh_secs: Option<u64>,
    metrics_refresh_secs: Option<u64>,
    top_limit: Option<u32>,
    trend_days: Option<u32>,
}

/// `<config_dir>/epiboard`
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("epiboard"))
}

impl ClientConfig {
    /// Load from an explicit file, or the default location when `None`.
    /// A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_dir()
                .ok_or(CoreError::ConfigDirNotFound)?
                .join(CONFIG_FILE),
        };

        let mut config = Self::default();
        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| CoreError::FileRead {
                path: path.clone(),
                source,
            })?;
            config.merge_toml(&content, &path)?;
            debug!(path = %path.display(), "Loaded config file");
        }

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn merge_toml(&mut self, content: &str, path: &Path) -> Result<(), CoreError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(root) = file.api_root {
            self.api_root = root;
        }
        if let Some(dir) = file.state_dir {
            self.state_dir = dir;
        }
        if let Some(secs) = file.dashboard_refresh_secs {
            self.dashboard_refresh = Duration::from_secs(secs);
        }
        if let Some(secs) = file.metrics_refresh_secs {
            self.metrics_refresh = Duration::from_secs(secs);
        }
        if let Some(limit) = file.top_limit {
            self.top_limit = limit;
        }
        if let Some(days) = file.trend_days {
            self.trend_days = days;
        }
        Ok(())
    }

    /// Apply `EPIBOARD_*` overrides through an injectable lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(root) = lookup(ENV_API_ROOT).filter(|v| !v.is_empty()) {
            self.api_root = root;
        }
        if let Some(dir) = lookup(ENV_STATE_DIR).filter(|v| !v.is_empty()) {
            self.state_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(self.api_root.starts_with("http://") || self.api_root.starts_with("https://")) {
            return Err(CoreError::InvalidConfig {
                message: format!("api_root must be an http(s) URL, got '{}'", self.api_root),
            });
        }
        if self.dashboard_refresh.is_zero() || self.metrics_refresh.is_zero() {
            return Err(CoreError::InvalidConfig {
                message: "refresh intervals must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// `api_root` without trailing slash, plus `/api/v1`
    pub fn api_base(&self) -> String {
        format!("{}{}", self.api_root.trim_end_matches('/'), API_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.dashboard_refresh, Duration::from_secs(300));
        assert_eq!(config.metrics_refresh, Duration::from_secs(60));
        assert_eq!(config.api_base(), "http://localhost:8000/api/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_file_then_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "api_root = \"https://covid.example.org/\"\ndashboard_refresh_secs = 30\nmetrics_refresh_secs = 15\ntop_limit = 5\n",
        )
        .unwrap();

        let mut config = ClientConfig::default();
        let content = std::fs::read_to_string(&path).unwrap();
        config.merge_toml(&content, &path).unwrap();
        assert_eq!(config.api_base(), "https://covid.example.org/api/v1");
        assert_eq!(config.dashboard_refresh, Duration::from_secs(30));
        assert_eq!(config.metrics_refresh, Duration::from_secs(15));
        assert_eq!(config.top_limit, 5);
        assert_eq!(config.trend_days, 30);

        let env: HashMap<&str, &str> = [(ENV_STATE_DIR, "/tmp/epiboard-state")].into();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.state_dir, PathBuf::from("/tmp/epiboard-state"));
        assert_eq!(config.api_root, "https://covid.example.org/");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut config = ClientConfig::default();
        let err = config
            .merge_toml("api_rot = \"x\"", Path::new("config.toml"))
            .unwrap_err();
        assert!(matches!(err, CoreError::ConfigParse { .. }));
    }

    #[test]
    fn test_invalid_root() {
        let config = ClientConfig {
            api_root: "localhost:8000".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.top_limit, 10);
    }
}
