use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("configuration has not been initialized")]
    NotInitialized,

    #[error("property '{0}' does not exist")]
    KeyNotFound(String),

    #[error("property '{key}' is not a valid {expected} (value: {raw}): {reason}")]
    MalformedValue {
        key: String,
        expected: &'static str,
        raw: String,
        reason: String,
    },

    #[error("external config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read external config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration text: {0}")]
    InvalidToml(#[from] toml::de::Error),
}

impl ConfigError {
    /// True for the errors raised while loading an external override file.
    pub fn is_external_load_failure(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::ReadError { .. } | Self::ParseError { .. }
        )
    }
}
