//! A replaceable, process-wide configuration slot.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use toml::Value;

use super::access::Properties;
use super::dump::ConfigDump;
use super::{ConfigError, ConfigTree, EnvConfig, EnvConfigBuilder};

/// Holds the current [`EnvConfig`] for hosts that want a single global
/// instance.
///
/// Each initialization builds a complete `EnvConfig` and swaps it in as one
/// snapshot, so readers never observe a tree from one initialization paired
/// with the environment or override of another. Every accessor fails with
/// [`ConfigError::NotInitialized`] until the first successful
/// initialization. A failed initialization leaves the previous snapshot in
/// place.
///
/// ```
/// use envcfg::{ConfigTree, Properties, SharedEnvConfig};
///
/// static CONFIG: SharedEnvConfig = SharedEnvConfig::new();
///
/// assert!(CONFIG.get_int("port").is_err());
///
/// let tree: ConfigTree = "[envConfig.default]\nport = 8080".parse()?;
/// CONFIG.init_config(tree, false)?;
/// assert_eq!(CONFIG.get_int("port")?, 8080);
/// # Ok::<(), envcfg::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct SharedEnvConfig {
    current: ArcSwapOption<EnvConfig>,
}

impl SharedEnvConfig {
    pub const fn new() -> Self {
        Self {
            current: ArcSwapOption::const_empty(),
        }
    }

    /// Initializes with default builder settings, replacing any previous
    /// configuration.
    pub fn init_config(
        &self,
        tree: ConfigTree,
        verbose: bool,
    ) -> Result<Arc<EnvConfig>, ConfigError> {
        self.init_with(EnvConfig::builder().verbose(verbose), tree)
    }

    /// Initializes through a customized builder, replacing any previous
    /// configuration.
    pub fn init_with(
        &self,
        builder: EnvConfigBuilder,
        tree: ConfigTree,
    ) -> Result<Arc<EnvConfig>, ConfigError> {
        let config = Arc::new(builder.init(tree)?);
        self.current.store(Some(Arc::clone(&config)));
        Ok(config)
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Result<Arc<EnvConfig>, ConfigError> {
        self.current.load_full().ok_or_else(|| {
            tracing::warn!("configuration not initialized yet");
            ConfigError::NotInitialized
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn environment(&self) -> Result<String, ConfigError> {
        Ok(self.current()?.environment().to_string())
    }

    pub fn external_config_file(&self) -> Result<Option<std::path::PathBuf>, ConfigError> {
        Ok(self
            .current()?
            .external_config_file()
            .map(|path| path.to_path_buf()))
    }

    /// Logs a dump of the current configuration.
    pub fn dump_config(&self) -> Result<ConfigDump, ConfigError> {
        Ok(self.current()?.dump_config())
    }
}

impl Default for SharedEnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Properties for SharedEnvConfig {
    fn property(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        self.current()?.property(key)
    }
}
