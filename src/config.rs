//! Run loop configuration.
//!
//! Configuration is plain serializable data with defaults for every field,
//! so a partial JSON document is always a valid configuration.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for the expected shape
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),

    /// The document parsed but describes an unusable configuration
    #[error("Configuration rejected: {0}")]
    Rejected(String),
}

/// Settings shared by every driver through the run options.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Log every action entering the loop at debug level.
    pub log_actions: bool,
}

impl RunConfig {
    /// Parse a run configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        parse(json)
    }
}

pub(crate) fn parse<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = RunConfig::from_json("{}").unwrap();

        assert_eq!(config, RunConfig::default());
        assert!(!config.log_actions);
    }

    #[test]
    fn log_actions_is_read() {
        let config = RunConfig::from_json(r#"{"log_actions": true}"#).unwrap();

        assert!(config.log_actions);
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = RunConfig::from_json("{log_actions");

        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = RunConfig { log_actions: true };
        let json = serde_json::to_string(&config).unwrap();

        assert_eq!(RunConfig::from_json(&json).unwrap(), config);
    }
}
