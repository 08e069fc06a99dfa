//! External override file loading.

use std::path::Path;

use super::{ConfigError, ConfigTree};

/// Parses an external override file into a [`ConfigTree`].
///
/// Implementations must fail if the file is missing, unreadable, or malformed.
pub trait ExternalLoader: Send + Sync + std::fmt::Debug {
    fn load(&self, path: &Path) -> Result<ConfigTree, ConfigError>;
}

/// Loads external override files written in TOML.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFileLoader;

impl ExternalLoader for TomlFileLoader {
    fn load(&self, path: &Path) -> Result<ConfigTree, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(ConfigTree::new(table))
    }
}
