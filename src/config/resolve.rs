//! Fallback resolution across the external override, environment, and
//! default layers.

use std::fmt;

use toml::Value;

use super::ConfigTree;

/// Name of the environment used when none is configured, and of the section
/// that is always consulted last.
pub const DEFAULT_ENVIRONMENT: &str = "default";

/// The layer a property was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    External,
    Environment,
    Default,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::External => write!(f, "external"),
            Layer::Environment => write!(f, "environment"),
            Layer::Default => write!(f, "default"),
        }
    }
}

/// Walks the precedence chain for a property key.
///
/// 1. the external override tree, keyed verbatim
/// 2. `<root>.<environment>.<key>` in the primary tree
/// 3. `<root>.default.<key>` in the primary tree
///
/// The first hit wins. Values from different layers are never merged.
#[derive(Debug, Clone)]
pub struct Resolver {
    tree: ConfigTree,
    root: String,
    environment: String,
    external: Option<ConfigTree>,
}

impl Resolver {
    pub fn new(
        tree: ConfigTree,
        root: impl Into<String>,
        environment: impl Into<String>,
        external: Option<ConfigTree>,
    ) -> Self {
        Self {
            tree,
            root: root.into(),
            environment: environment.into(),
            external,
        }
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn external(&self) -> Option<&ConfigTree> {
        self.external.as_ref()
    }

    pub fn resolve(&self, key: &str) -> Option<&Value> {
        self.resolve_with_layer(key).map(|(value, _)| value)
    }

    /// Resolves `key` and reports which layer supplied the value.
    pub fn resolve_with_layer(&self, key: &str) -> Option<(&Value, Layer)> {
        if let Some(value) = self.external.as_ref().and_then(|ext| ext.lookup(key)) {
            return Some((value, Layer::External));
        }
        if let Some(value) = self.tree.lookup(&self.scoped(&self.environment, key)) {
            return Some((value, Layer::Environment));
        }
        self.tree
            .lookup(&self.scoped(DEFAULT_ENVIRONMENT, key))
            .map(|value| (value, Layer::Default))
    }

    fn scoped(&self, section: &str, key: &str) -> String {
        format!("{}.{}.{}", self.root, section, key)
    }
}
