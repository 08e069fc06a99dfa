//! Diagnostic view of the effective tree-resident configuration.

use std::collections::BTreeMap;
use std::path::PathBuf;

use super::resolve::DEFAULT_ENVIRONMENT;
use super::value::PropertyValue;
use super::ConfigTree;

/// The default section overlaid key-wise by the active environment section.
///
/// External override values are not part of the dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDump {
    pub environment: String,
    pub external_file: Option<PathBuf>,
    /// Flattened dotted keys and their rendered values.
    pub entries: BTreeMap<String, String>,
    /// False when a non-default environment has no section in the tree.
    pub environment_section_found: bool,
}

impl ConfigDump {
    pub(crate) fn build(
        tree: &ConfigTree,
        root: &str,
        environment: &str,
        external_file: Option<PathBuf>,
    ) -> Self {
        let mut entries = BTreeMap::new();

        if let Some(section) = tree.section(&format!("{root}.{DEFAULT_ENVIRONMENT}")) {
            overlay(&mut entries, ConfigTree::flatten(section));
        }

        let mut environment_section_found = true;
        if environment != DEFAULT_ENVIRONMENT {
            match tree.section(&format!("{root}.{environment}")) {
                Some(section) => overlay(&mut entries, ConfigTree::flatten(section)),
                None => {
                    tracing::warn!(
                        environment,
                        "no config found for environment, using default config"
                    );
                    environment_section_found = false;
                }
            }
        }

        Self {
            environment: environment.to_string(),
            external_file,
            entries,
            environment_section_found,
        }
    }

    /// Writes the dump to the `tracing` info level.
    pub fn log(&self) {
        tracing::info!("--- dumping configuration for environment: {} ---", self.environment);
        tracing::info!(environment = %self.environment, "environment");
        match &self.external_file {
            Some(path) => tracing::info!(path = %path.display(), "external config file"),
            None => tracing::info!("external config file: none"),
        }
        tracing::info!(count = self.entries.len(), "number of config entries");
        for (key, value) in &self.entries {
            tracing::info!("{key} = {value}");
        }
        tracing::info!("--- end of config dump ---");
    }
}

fn overlay(entries: &mut BTreeMap<String, String>, layer: Vec<(String, &toml::Value)>) {
    for (key, value) in layer {
        let rendered = PropertyValue::from_value(value)
            .map(|v| v.to_string())
            .unwrap_or_else(|| value.to_string());
        entries.insert(key, rendered);
    }
}
