//! Configuration loading from disk and command line overrides.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::context::ForwarderContext;
use crate::config::schema::ForwarderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values supplied on the command line or through the environment.
/// Each one that is set replaces the value from the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target_host: Option<String>,
    pub access_log: Option<bool>,
    pub bind_address: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ForwarderConfig) {
        if let Some(target_host) = &self.target_host {
            config.forwarder.target_host = target_host.clone();
        }
        if let Some(enabled) = self.access_log {
            config.access_logging.enabled = enabled;
        }
        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }
    }
}

/// Parse configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ForwarderConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from an optional TOML file and apply overrides.
///
/// Without a file the defaults are used, so a forwarder can be started from
/// flags alone.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<ForwarderConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => ForwarderConfig::default(),
    };
    overrides.apply(&mut config);
    Ok(config)
}

/// Run the startup gate over a loaded configuration.
pub fn build_context(config: &ForwarderConfig) -> Result<ForwarderContext, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}
