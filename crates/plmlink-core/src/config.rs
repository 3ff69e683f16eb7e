//! Connector configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::window;

/// How the connector fetches data from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Sliding-window aggregate export (`bkd/aggr_exp_dt`). Tokens are
    /// single-use: one is minted before every fetch and dropped right
    /// after it.
    #[default]
    Windowed,
    /// Whole-series aggregate snapshot (`bkd/aggr`). The token minted at
    /// construction is reused until a fetch failure drops it.
    Snapshot,
}

/// Time-window bounds for [`FetchMode::Windowed`], as configured.
///
/// Both bounds use the backend's `yyyy-MM-dd HH:mm:ss` shape; `highest`
/// may also be the literal `now`, which keeps the window open-ended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Inclusive start of the polled range.
    pub lowest: String,
    /// Exclusive end of the polled range, or `now`.
    pub highest: String,
}

/// Connector configuration.
///
/// Credentials and addressing are immutable for the connector's lifetime;
/// everything mutable (token, window position) lives inside the connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Backend account name.
    pub username: String,
    /// Backend account password.
    pub password: String,
    /// Backend user group.
    pub group: String,
    /// Base URL of the backend API, e.g. `https://plm.example/api/`.
    pub base_url: String,
    /// Repository that scopes the model.
    pub repository: String,
    /// Model to discover sensors under.
    pub model: String,
    /// Exact name of the sensor to poll.
    pub signal_name: String,
    /// Seconds between polls when driven by the CLI harness.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Fetch mode.
    #[serde(default)]
    pub mode: FetchMode,
    /// Window bounds; required when `mode` is `windowed`.
    #[serde(default)]
    pub window: Option<WindowConfig>,
}

fn default_poll_interval() -> u64 {
    10
}

impl ConnectorConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Load and validate configuration from a TOML file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return all errors at once.
    ///
    /// This checks:
    /// - Base URL starts with `http://` or `https://`
    /// - Credential and addressing fields are not empty
    /// - Poll interval is at least 1 second
    /// - Windowed mode has window bounds, and they parse
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            errors.push(ValidationError {
                field: "base_url".to_string(),
                message: format!(
                    "must start with http:// or https://, got '{}'",
                    self.base_url
                ),
            });
        }

        for (field, value) in [
            ("username", &self.username),
            ("password", &self.password),
            ("group", &self.group),
            ("repository", &self.repository),
            ("model", &self.model),
            ("signal_name", &self.signal_name),
        ] {
            if value.is_empty() {
                errors.push(ValidationError {
                    field: field.to_string(),
                    message: "cannot be empty".to_string(),
                });
            }
        }

        if self.poll_interval_secs == 0 {
            errors.push(ValidationError {
                field: "poll_interval_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        match (&self.mode, &self.window) {
            (FetchMode::Windowed, None) => {
                errors.push(ValidationError {
                    field: "window".to_string(),
                    message: "windowed mode requires window bounds".to_string(),
                });
            }
            (_, Some(w)) => {
                if window::parse_datetime(&w.lowest).is_err() {
                    errors.push(ValidationError {
                        field: "window.lowest".to_string(),
                        message: format!("'{}' is not yyyy-MM-dd HH:mm:ss", w.lowest),
                    });
                }
                if window::WindowBound::parse(&w.highest).is_err() {
                    errors.push(ValidationError {
                        field: "window.highest".to_string(),
                        message: format!("'{}' is not yyyy-MM-dd HH:mm:ss or 'now'", w.highest),
                    });
                }
            }
            (FetchMode::Snapshot, None) => {}
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// A single configuration validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The offending field, e.g. `window.lowest`.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the config file as TOML.
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to serialize the config.
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    /// Failed to write the config file.
    #[error("Failed to write config to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config did not validate.
    #[error("Invalid configuration: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ConnectorConfig {
        ConnectorConfig {
            username: "user".to_string(),
            password: "secret".to_string(),
            group: "sensors".to_string(),
            base_url: "https://plm.example/api/".to_string(),
            repository: "ProjectsRep".to_string(),
            model: "Turbine".to_string(),
            signal_name: "Temp".to_string(),
            poll_interval_secs: 10,
            mode: FetchMode::Windowed,
            window: Some(WindowConfig {
                lowest: "2024-01-01 00:00:00".to_string(),
                highest: "2024-01-01 02:00:00".to_string(),
            }),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        valid_config().validate().unwrap();
    }

    #[test]
    fn test_now_sentinel_is_valid_highest() {
        let mut config = valid_config();
        config.window.as_mut().unwrap().highest = "now".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn test_windowed_mode_requires_window() {
        let mut config = valid_config();
        config.window = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("window"));
    }

    #[test]
    fn test_snapshot_mode_needs_no_window() {
        let mut config = valid_config();
        config.mode = FetchMode::Snapshot;
        config.window = None;
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = valid_config();
        config.base_url = "plm.example/api".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_errors_accumulate() {
        let mut config = valid_config();
        config.username = String::new();
        config.signal_name = String::new();
        config.poll_interval_secs = 0;
        match config.validate().unwrap_err() {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_bad_window_dates_rejected() {
        let mut config = valid_config();
        config.window = Some(WindowConfig {
            lowest: "01/01/2024".to_string(),
            highest: "later".to_string(),
        });
        match config.validate().unwrap_err() {
            ConfigError::Validation(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().any(|e| e.field == "window.lowest"));
                assert!(errors.iter().any(|e| e.field == "window.highest"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("connector.toml");

        let config = valid_config();
        config.save(&path).unwrap();

        let loaded = ConnectorConfig::load_validated(&path).unwrap();
        assert_eq!(loaded.signal_name, "Temp");
        assert_eq!(loaded.mode, FetchMode::Windowed);
        assert_eq!(loaded.window.unwrap().lowest, "2024-01-01 00:00:00");
    }

    #[test]
    fn test_defaults_applied() {
        let raw = r#"
            username = "user"
            password = "secret"
            group = "sensors"
            base_url = "https://plm.example/api/"
            repository = "ProjectsRep"
            model = "Turbine"
            signal_name = "Temp"
            [window]
            lowest = "2024-01-01 00:00:00"
            highest = "now"
        "#;
        let config: ConnectorConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.mode, FetchMode::Windowed);
    }
}
