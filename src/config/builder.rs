use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use toml::{Table, Value};

use super::access::Properties;
use super::dump::ConfigDump;
use super::loader::{ExternalLoader, TomlFileLoader};
use super::resolve::{Layer, Resolver, DEFAULT_ENVIRONMENT};
use super::{ConfigError, ConfigTree};

/// Root section consulted when none is configured.
pub const DEFAULT_ROOT: &str = "envConfig";

/// Key under the root section holding the active environment name.
pub const ENVIRONMENT_KEY: &str = "env";

/// Key naming the external override file. Looked up in the active
/// environment section, then the `default` section, then directly under the
/// root section.
pub const DEFAULT_EXTERNAL_FILE_KEY: &str = "externalConfigFile";

/// Environment-aware configuration resolved from a [`ConfigTree`].
///
/// The tree is expected to look like this:
///
/// ```toml
/// [envConfig]
/// env = "prod"
///
/// [envConfig.default]
/// port = 8080
/// hosts = ["a", "b"]
///
/// [envConfig.prod]
/// port = 443
/// externalConfigFile = "/etc/myapp/secrets.toml"
/// ```
///
/// Properties are resolved from the external override file first (keys are
/// matched without any prefix), then from the active environment section,
/// then from the `default` section.
///
/// An `EnvConfig` is immutable once built. Re-initializing means building a
/// new value; see [`SharedEnvConfig`](super::SharedEnvConfig) for a
/// process-wide slot.
///
/// ## Example
///
/// ```no_run
/// use envcfg::{ConfigTree, EnvConfig, Properties};
///
/// let tree: ConfigTree = std::fs::read_to_string("app.toml")?.parse()?;
/// let config = EnvConfig::init(tree)?;
///
/// let port = config.get_int("port")?;
/// let debug = config.get_bool_or_false("debug")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct EnvConfig {
    resolver: Resolver,
    external_file: Option<PathBuf>,
}

impl EnvConfig {
    /// Creates a builder with the default root section, external file key,
    /// and TOML loader.
    pub fn builder() -> EnvConfigBuilder {
        EnvConfigBuilder::default()
    }

    /// Initializes from `tree` with default settings.
    pub fn init(tree: ConfigTree) -> Result<Self, ConfigError> {
        Self::builder().init(tree)
    }

    /// Initializes from `tree` and logs a dump of the effective configuration.
    pub fn init_verbose(tree: ConfigTree) -> Result<Self, ConfigError> {
        Self::builder().verbose(true).init(tree)
    }

    pub fn environment(&self) -> &str {
        self.resolver.environment()
    }

    /// Path of the external override file configured for this environment.
    pub fn external_config_file(&self) -> Option<&Path> {
        self.external_file.as_deref()
    }

    pub fn tree(&self) -> &ConfigTree {
        self.resolver.tree()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolves `key` and reports which layer supplied it.
    pub fn resolve_with_layer(&self, key: &str) -> Option<(&Value, Layer)> {
        self.resolver.resolve_with_layer(key)
    }

    /// Builds the merged default + environment view.
    pub fn dump(&self) -> ConfigDump {
        ConfigDump::build(
            self.resolver.tree(),
            self.resolver.root(),
            self.resolver.environment(),
            self.external_file.clone(),
        )
    }

    /// Builds the dump and writes it to the log.
    pub fn dump_config(&self) -> ConfigDump {
        let dump = self.dump();
        dump.log();
        dump
    }

    /// Deserializes the table `name`, merging the default section's copy with
    /// the environment's copy. Nested tables are merged recursively; other
    /// values from the environment replace the default ones.
    pub fn section<T: DeserializeOwned>(&self, name: &str) -> Result<T, ConfigError> {
        let root = self.resolver.root();
        let tree = self.resolver.tree();
        let mut layers = vec![tree.section(&format!("{root}.{DEFAULT_ENVIRONMENT}.{name}"))];
        if self.environment() != DEFAULT_ENVIRONMENT {
            layers.push(tree.section(&format!("{root}.{}.{name}", self.environment())));
        }

        let mut merged: Option<Table> = None;
        for layer in layers.into_iter().flatten() {
            deep_merge(merged.get_or_insert_with(Table::new), layer.clone());
        }
        let merged = merged.ok_or_else(|| ConfigError::KeyNotFound(name.to_string()))?;

        let merged = Value::Table(merged);
        let raw = merged.to_string();
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::MalformedValue {
                key: name.to_string(),
                expected: std::any::type_name::<T>(),
                raw,
                reason: e.to_string(),
            })
    }
}

impl Properties for EnvConfig {
    fn property(&self, key: &str) -> Result<Option<Value>, ConfigError> {
        Ok(self.resolver.resolve(key).cloned())
    }
}

/// Builder for [`EnvConfig`].
#[derive(Debug)]
#[must_use = "builders do nothing until .init() is called"]
pub struct EnvConfigBuilder {
    root: String,
    external_file_key: String,
    loader: Arc<dyn ExternalLoader>,
    verbose: bool,
}

impl Default for EnvConfigBuilder {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            external_file_key: DEFAULT_EXTERNAL_FILE_KEY.to_string(),
            loader: Arc::new(TomlFileLoader),
            verbose: false,
        }
    }
}

impl EnvConfigBuilder {
    /// Sets the top-level section holding `env` and the environment sections.
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the key naming the external override file.
    pub fn external_file_key(mut self, key: impl Into<String>) -> Self {
        self.external_file_key = key.into();
        self
    }

    /// Replaces the loader used for the external override file.
    pub fn loader(mut self, loader: impl ExternalLoader + 'static) -> Self {
        self.loader = Arc::new(loader);
        self
    }

    /// Logs a dump of the effective configuration after initialization.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Selects the environment, loads the external override, and builds the
    /// configuration.
    ///
    /// Environment and external path discovery only read `tree`, never the
    /// override file. The override path is taken from the first of
    /// `<root>.<env>.<key>`, `<root>.default.<key>` and `<root>.<key>`. A
    /// configured override that cannot be loaded fails initialization.
    pub fn init(self, tree: ConfigTree) -> Result<EnvConfig, ConfigError> {
        let environment = tree
            .lookup_str(&format!("{}.{}", self.root, ENVIRONMENT_KEY))
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());

        tracing::info!(environment = %environment, "initializing configuration");

        let root = &self.root;
        let key = &self.external_file_key;
        let external_file = [
            format!("{root}.{environment}.{key}"),
            format!("{root}.{DEFAULT_ENVIRONMENT}.{key}"),
            format!("{root}.{key}"),
        ]
        .iter()
        .find_map(|path| tree.lookup_str(path))
        .map(PathBuf::from);

        let external = match &external_file {
            Some(path) => {
                let loaded = self.loader.load(path).inspect_err(|e| {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "external config file could not be loaded"
                    );
                })?;
                tracing::debug!(path = %path.display(), "loaded external config file");
                Some(loaded)
            }
            None => None,
        };

        let config = EnvConfig {
            resolver: Resolver::new(tree, self.root, environment, external),
            external_file,
        };

        if self.verbose {
            config.dump_config();
        }

        Ok(config)
    }
}

fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
