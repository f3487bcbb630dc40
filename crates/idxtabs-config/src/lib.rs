#![deny(unsafe_code)]

//! Configuration loading and validation for idxtabs.
//!
//! Loads TOML configuration files and validates them. The [`AppConfig`] type
//! says where the section availability artifact lives, how to read it, and
//! how verbose logging should be.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Artifact formats accepted in `artifact.format`.
pub const ARTIFACT_FORMATS: [&str; 3] = ["auto", "js", "json"];

/// Log levels accepted in `logging.level`.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the section availability artifact comes from.
    #[serde(default)]
    pub artifact: ArtifactConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location and format of the generator's artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactConfig {
    /// Path to `searchdata.js` (or a JSON export of it). When unset, the
    /// built-in table is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// One of [`ARTIFACT_FORMATS`].
    #[serde(default = "default_artifact_format")]
    pub format: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: None,
            format: default_artifact_format(),
        }
    }
}

fn default_artifact_format() -> String {
    "auto".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ARTIFACT_FORMATS.contains(&self.artifact.format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "artifact.format must be one of {:?}, got {:?}",
                ARTIFACT_FORMATS, self.artifact.format
            )));
        }

        if let Some(path) = &self.artifact.path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::Validation(
                "artifact.path must not be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }

        Ok(())
    }

    /// Resolve `artifact.path` against the directory holding the config file.
    ///
    /// Absolute paths are returned unchanged.
    pub fn artifact_path(&self, config_path: &Path) -> Option<PathBuf> {
        let path = self.artifact.path.as_ref()?;
        if path.is_absolute() {
            return Some(path.clone());
        }
        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.artifact.path, None);
        assert_eq!(config.artifact.format, "auto");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
            [artifact]
            path = "doc/html/javascript/searchdata.js"
            format = "js"

            [logging]
            level = "debug"
        "#;
        let config = AppConfig::parse(toml).unwrap();
        assert_eq!(
            config.artifact.path,
            Some(PathBuf::from("doc/html/javascript/searchdata.js"))
        );
        assert_eq!(config.artifact.format, "js");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_bad_format() {
        let toml = r#"
            [artifact]
            format = "yaml"
        "#;
        let err = AppConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("artifact.format"));
    }

    #[test]
    fn test_validation_rejects_empty_path() {
        let toml = r#"
            [artifact]
            path = ""
        "#;
        let result = AppConfig::parse(toml);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let toml = r#"
            [logging]
            level = "loud"
        "#;
        let err = AppConfig::parse(toml).unwrap_err();
        assert!(err.to_string().contains("logging.level"));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let toml = r#"
            [artifact]
            format = 3
        "#;
        assert!(matches!(AppConfig::parse(toml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_artifact_path_relative_to_config() {
        let config = AppConfig::parse(
            r#"
            [artifact]
            path = "html/searchdata.js"
        "#,
        )
        .unwrap();
        assert_eq!(
            config.artifact_path(Path::new("/srv/docs/idxtabs.toml")),
            Some(PathBuf::from("/srv/docs/html/searchdata.js"))
        );
        assert_eq!(
            config.artifact_path(Path::new("idxtabs.toml")),
            Some(PathBuf::from("html/searchdata.js"))
        );
    }

    #[test]
    fn test_artifact_path_absolute_and_unset() {
        let config = AppConfig::parse(
            r#"
            [artifact]
            path = "/var/www/searchdata.js"
        "#,
        )
        .unwrap();
        assert_eq!(
            config.artifact_path(Path::new("/etc/idxtabs.toml")),
            Some(PathBuf::from("/var/www/searchdata.js"))
        );
        assert_eq!(
            AppConfig::default().artifact_path(Path::new("/etc/idxtabs.toml")),
            None
        );
    }

    #[test]
    fn test_serialize_round_trips_through_parse() {
        let config = AppConfig {
            artifact: ArtifactConfig {
                path: Some(PathBuf::from("searchdata.js")),
                format: "json".to_string(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(AppConfig::parse(&text).unwrap(), config);
    }

    #[test_log::test(tokio::test)]
    async fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("idxtabs.toml");
        tokio::fs::write(
            &path,
            r#"
            [logging]
            level = "trace"
        "#,
        )
        .await
        .unwrap();

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.logging.level, "trace");
    }

    #[tokio::test]
    async fn test_load_nonexistent_file() {
        let result = AppConfig::load(Path::new("/nonexistent/idxtabs.toml")).await;
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        tokio::fs::write(&path, "this is not [valid toml")
            .await
            .unwrap();

        let result = AppConfig::load(&path).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Validation("bad value".to_string());
        assert_eq!(err.to_string(), "validation error: bad value");
    }
}
