//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML config: {0}")]
    ParseError(toml::de::Error),

    #[error("Failed to render TOML config: {0}")]
    SerializeError(toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
