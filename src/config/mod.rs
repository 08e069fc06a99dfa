//! Environment-aware configuration resolution.

mod access;
mod builder;
mod dump;
mod error;
mod loader;
mod resolve;
mod shared;
mod tree;
mod value;

pub use access::{Lookup, Properties};
pub use builder::{
    EnvConfig, EnvConfigBuilder, DEFAULT_EXTERNAL_FILE_KEY, DEFAULT_ROOT, ENVIRONMENT_KEY,
};
pub use dump::ConfigDump;
pub use error::ConfigError;
pub use loader::{ExternalLoader, TomlFileLoader};
pub use resolve::{Layer, Resolver, DEFAULT_ENVIRONMENT};
pub use shared::SharedEnvConfig;
pub use tree::ConfigTree;
pub use value::{FromProperty, PropertyValue};
