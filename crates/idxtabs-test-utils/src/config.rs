//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use std::path::Path;

use idxtabs_config::AppConfig;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .artifact_path("searchdata.js")
///     .artifact_format("js")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn artifact_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config.artifact.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn artifact_format(mut self, format: &str) -> Self {
        self.config.artifact.format = format.to_string();
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Render the config as TOML, for tests that go through a config file.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(&self.config).expect("test config serializes")
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
