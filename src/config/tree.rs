//! Nested key/value configuration tree addressed by dotted paths.

use std::str::FromStr;

use toml::{Table, Value};

use super::ConfigError;

/// A read-only, TOML-backed configuration tree.
///
/// Values are addressed by dot-joined paths such as `envConfig.prod.db.host`.
/// Every path segment except the last must name a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    table: Table,
}

impl ConfigTree {
    pub fn new(table: Table) -> Self {
        Self { table }
    }

    /// Parses TOML text into a tree.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let table: Table = toml::from_str(text)?;
        Ok(Self { table })
    }

    pub fn as_table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Looks up a dotted path. Returns `None` if any segment is missing,
    /// empty, or traverses a non-table value.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        let mut current = self.table.get(first)?;

        for segment in segments {
            if segment.is_empty() {
                return None;
            }
            current = current.as_table()?.get(segment)?;
        }

        Some(current)
    }

    /// Looks up a dotted path and returns it as a string if it is a scalar.
    pub fn lookup_str(&self, path: &str) -> Option<String> {
        self.lookup(path).and_then(scalar_to_string)
    }

    /// Returns the table at `path`, if the path names one.
    pub fn section(&self, path: &str) -> Option<&Table> {
        self.lookup(path)?.as_table()
    }

    /// Enumerates the leaves under `table` as `(dotted key, value)` pairs,
    /// recursing into nested tables.
    pub fn flatten(table: &Table) -> Vec<(String, &Value)> {
        let mut entries = Vec::new();
        flatten_into(table, None, &mut entries);
        entries
    }
}

impl From<Table> for ConfigTree {
    fn from(table: Table) -> Self {
        Self::new(table)
    }
}

impl FromStr for ConfigTree {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn flatten_into<'a>(table: &'a Table, prefix: Option<&str>, out: &mut Vec<(String, &'a Value)>) {
    for (key, value) in table {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::Table(nested) => flatten_into(nested, Some(&path), out),
            other => out.push((path, other)),
        }
    }
}

/// Renders a scalar value as a string. Arrays and tables yield `None`.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(i) => Some(i.to_string()),
        Value::Float(f) => Some(format!("{f:?}")),
        Value::Boolean(b) => Some(b.to_string()),
        Value::Datetime(dt) => Some(dt.to_string()),
        Value::Array(_) | Value::Table(_) => None,
    }
}
