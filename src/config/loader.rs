use super::types::MonitoringConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Environment variable prefix, e.g. `APIGW_MONITORING_API_GATEWAY__STAGE`.
pub const ENV_PREFIX: &str = "APIGW_MONITORING";

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    inline: Option<(String, FileFormat)>,
    load_env: bool,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            config_file: None,
            inline: None,
            load_env: false,
        }
    }

    /// Load configuration from file (TOML, YAML or JSON by extension)
    pub fn load_from_file(mut self, path: Option<&Path>) -> Self {
        self.config_file = path.map(Path::to_path_buf);
        self
    }

    /// Load configuration from an in-memory document
    pub fn load_from_str(mut self, content: &str, format: FileFormat) -> Self {
        self.inline = Some((content.to_string(), format));
        self
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Build and validate the final configuration
    pub fn build(self) -> Result<MonitoringConfig> {
        let mut builder = Config::builder();

        if let Some((content, format)) = &self.inline {
            builder = builder.add_source(File::from_str(content, *format));
        } else if let Some(config_path) = &self.config_file {
            builder = builder.add_source(File::from(config_path.as_path()).required(true));
        } else {
            // Try to load from standard locations
            builder = builder
                .add_source(File::with_name("apigw-monitoring").required(false))
                .add_source(File::with_name("config/apigw-monitoring").required(false));
        }

        // Add environment variables if requested
        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let config: MonitoringConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .validate()
            .context("Configuration failed validation")?;

        tracing::debug!(
            api = %config.api_gateway.api_name,
            stage = %config.api_gateway.stage,
            alarms = config.alarms.len(),
            missing_data_alarms = config.missing_data_alarms.len(),
            "configuration loaded"
        );

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
