pub mod config;

pub use config::{
    ConfigDump, ConfigError, ConfigTree, EnvConfig, EnvConfigBuilder, ExternalLoader,
    FromProperty, Layer, Lookup, Properties, PropertyValue, SharedEnvConfig, TomlFileLoader,
};
