use std::env::VarError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable was present but unreadable (e.g. not unicode).
    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] VarError),

    /// A variable (or its default) could not be parsed into the target type.
    #[error("Could not parse {key}: {reason}")]
    ParseError { key: String, reason: String },

    /// The values parsed but do not make sense together.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
