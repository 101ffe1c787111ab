// src/config.rs

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::ct_log::CtLogProvider;

#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub log_list_url: Option<String>,  // Load the registry from Google's log list
    #[serde(default)]
    pub include_readonly: bool,
}

fn default_timeout_secs() -> u64 { 10 }

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            log_list_url: None,
            include_readonly: false,
        }
    }
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub logs: Vec<CtLogProvider>,  // Replaces the built-in registry when non-empty
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if cfg.submission.timeout_secs == 0 {
            anyhow::bail!("submission.timeout_secs must be greater than 0");
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_config_from_valid_toml() {
        let temp_file = write_config(
            r#"
[submission]
timeout_secs = 5
log_list_url = "https://www.gstatic.com/ct/log_list/v3/log_list.json"
include_readonly = true

[logging]
level = "debug"

[[logs]]
name = "my_log"
key = "a2V5"
url = "https://log.example/"

[[logs]]
name = "other_log"
url = "https://other.example/ct/"
        "#,
        );

        let config = Config::from_file(temp_file.path()).unwrap();

        assert_eq!(config.submission.timeout(), Duration::from_secs(5));
        assert!(config.submission.include_readonly);
        assert_eq!(
            config.submission.log_list_url.as_deref(),
            Some("https://www.gstatic.com/ct/log_list/v3/log_list.json")
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logs.len(), 2);
        assert_eq!(config.logs[0].name, "my_log");
        assert_eq!(config.logs[0].key, "a2V5");
        assert_eq!(config.logs[1].key, "");
    }

    #[test]
    fn test_config_empty_toml_uses_defaults() {
        let temp_file = write_config("");

        let config = Config::from_file(temp_file.path()).unwrap();

        assert_eq!(config.submission.timeout_secs, 10);
        assert!(config.submission.log_list_url.is_none());
        assert!(!config.submission.include_readonly);
        assert_eq!(config.logging.level, "info");
        assert!(config.logs.is_empty());
    }

    #[test]
    fn test_config_invalid_toml() {
        let temp_file = write_config("invalid toml content {{{");
        assert!(Config::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_log_missing_url() {
        let temp_file = write_config(
            r#"
[[logs]]
name = "incomplete"
        "#,
        );
        assert!(Config::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_zero_timeout_rejected() {
        let temp_file = write_config(
            r#"
[submission]
timeout_secs = 0
        "#,
        );
        assert!(Config::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_nonexistent_file() {
        let result = Config::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }
}
