//! Client configuration.
//!
//! Precedence, lowest first: built-in defaults, `config.toml`, environment
//! variables, command-line flags (applied by the CLI).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

const APP_DIR: &str = "taskdesk";
const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding `api_url`.
pub const ENV_API_URL: &str = "TASKDESK_API_URL";
/// Environment variable overriding `data_dir`.
pub const ENV_DATA_DIR: &str = "TASKDESK_DATA_DIR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not determine a data directory; set TASKDESK_DATA_DIR")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash.
    pub api_url: String,
    /// Directory holding durable storage. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
    /// Reject user records that fail [`crate::models::User::validate`].
    pub strict_user_validation: bool,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::DEFAULT_API_URL.to_string(),
            data_dir: None,
            request_timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            strict_user_validation: false,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default config file location (`<config_dir>/taskdesk/config.toml`).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.normalize();
        Ok(config)
    }

    /// Apply `TASKDESK_*` overrides read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self.normalize();
    }

    /// Override the API base URL (from `--api-url`).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self.normalize();
        self
    }

    fn normalize(&mut self) {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        self.api_url = if trimmed.is_empty() {
            Self::DEFAULT_API_URL.to_string()
        } else {
            trimmed.to_string()
        };
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved storage directory.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|d| d.join(APP_DIR))
                .ok_or(ConfigError::NoDataDir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_url, "http://localhost:5000/api");
        assert!(!config.strict_user_validation);
    }

    #[test]
    fn file_values_and_partial_tables() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://tasks.example.com/api/\"\nstrict_user_validation = true\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url, "https://tasks.example.com/api");
        assert!(config.strict_user_validation);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_url = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn env_overrides_file() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            ENV_API_URL => Some("http://127.0.0.1:9000/api/".to_string()),
            ENV_DATA_DIR => Some("/tmp/taskdesk-test".to_string()),
            _ => None,
        });
        assert_eq!(config.api_url, "http://127.0.0.1:9000/api");
        assert_eq!(
            config.data_dir().unwrap(),
            PathBuf::from("/tmp/taskdesk-test")
        );
    }

    #[test]
    fn blank_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env(|_| Some("  ".to_string()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flag_override() {
        let config = Config::default().with_api_url("http://h/api//");
        assert_eq!(config.api_url, "http://h/api");
    }
}
