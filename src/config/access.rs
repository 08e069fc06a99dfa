//! Typed property accessors.
//!
//! Every accessor family comes in three flavors:
//!
//! - `get_*` is for required settings. It fails with
//!   [`ConfigError::KeyNotFound`] or [`ConfigError::MalformedValue`].
//! - `get_*_or_none` is for optional settings. An absent key and a value
//!   that cannot be coerced both yield `None`.
//! - `get_*_or_default` behaves like `get_*_or_none`, substituting the
//!   supplied default.
//!
//! All of them fail with [`ConfigError::NotInitialized`] when the
//! underlying source has no configuration yet. Callers that must tell
//! "absent" from "malformed" use [`Properties::lookup`].

use std::path::PathBuf;

use toml::Value;
use url::Url;

use super::value::{coerce, FromProperty};
use super::ConfigError;

/// Outcome of a typed lookup.
#[derive(Debug)]
pub enum Lookup<T> {
    Value(T),
    Absent,
    Malformed(ConfigError),
}

impl<T> Lookup<T> {
    /// Collapses absent and malformed into `None`.
    pub fn ok(self) -> Option<T> {
        match self {
            Lookup::Value(value) => Some(value),
            Lookup::Absent | Lookup::Malformed(_) => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }
}

/// A source of resolved properties with typed accessors.
pub trait Properties {
    /// Resolves the raw value for `key`, or `None` if no layer has it.
    fn property(&self, key: &str) -> Result<Option<Value>, ConfigError>;

    fn lookup<T: FromProperty>(&self, key: &str) -> Result<Lookup<T>, ConfigError> {
        Ok(match self.property(key)? {
            None => Lookup::Absent,
            Some(value) => match coerce(key, &value) {
                Ok(value) => Lookup::Value(value),
                Err(e) => Lookup::Malformed(e),
            },
        })
    }

    fn get<T: FromProperty>(&self, key: &str) -> Result<T, ConfigError> {
        match self.lookup(key)? {
            Lookup::Value(value) => Ok(value),
            Lookup::Absent => Err(ConfigError::KeyNotFound(key.to_string())),
            Lookup::Malformed(e) => Err(e),
        }
    }

    fn get_or_none<T: FromProperty>(&self, key: &str) -> Result<Option<T>, ConfigError> {
        Ok(self.lookup(key)?.ok())
    }

    fn get_or_default<T: FromProperty>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        Ok(self.get_or_none(key)?.unwrap_or(default))
    }

    // String

    fn get_string(&self, key: &str) -> Result<String, ConfigError> {
        self.get(key)
    }

    fn get_string_or_none(&self, key: &str) -> Result<Option<String>, ConfigError> {
        self.get_or_none(key)
    }

    fn get_string_or_default(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        Ok(self
            .get_string_or_none(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    fn get_string_or_blank(&self, key: &str) -> Result<String, ConfigError> {
        self.get_string_or_default(key, "")
    }

    // Boolean

    fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.get(key)
    }

    fn get_bool_or_none(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.get_or_none(key)
    }

    fn get_bool_or_default(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        self.get_or_default(key, default)
    }

    fn get_bool_or_true(&self, key: &str) -> Result<bool, ConfigError> {
        self.get_bool_or_default(key, true)
    }

    fn get_bool_or_false(&self, key: &str) -> Result<bool, ConfigError> {
        self.get_bool_or_default(key, false)
    }

    // Integer

    fn get_int(&self, key: &str) -> Result<i64, ConfigError> {
        self.get(key)
    }

    fn get_int_or_none(&self, key: &str) -> Result<Option<i64>, ConfigError> {
        self.get_or_none(key)
    }

    fn get_int_or_default(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        self.get_or_default(key, default)
    }

    // List

    fn get_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        self.get(key)
    }

    fn get_list_or_none(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        self.get_or_none(key)
    }

    fn get_list_or_default(
        &self,
        key: &str,
        default: Vec<String>,
    ) -> Result<Vec<String>, ConfigError> {
        self.get_or_default(key, default)
    }

    fn get_list_or_empty(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        self.get_list_or_default(key, Vec::new())
    }

    // File path

    fn get_file(&self, key: &str) -> Result<PathBuf, ConfigError> {
        self.get(key)
    }

    fn get_file_or_none(&self, key: &str) -> Result<Option<PathBuf>, ConfigError> {
        self.get_or_none(key)
    }

    fn get_file_or_default(&self, key: &str, default: PathBuf) -> Result<PathBuf, ConfigError> {
        self.get_or_default(key, default)
    }

    // URL

    fn get_url(&self, key: &str) -> Result<Url, ConfigError> {
        self.get::<Url>(key).inspect_err(|e| {
            if let ConfigError::MalformedValue { raw, .. } = e {
                tracing::error!(key, raw = %raw, "malformed URL");
            }
        })
    }

    fn get_url_or_none(&self, key: &str) -> Result<Option<Url>, ConfigError> {
        self.get_or_none(key)
    }

    fn get_url_or_default(&self, key: &str, default: Url) -> Result<Url, ConfigError> {
        self.get_or_default(key, default)
    }
}
