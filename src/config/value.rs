//! Property values and their coercion into typed results.

use std::fmt;
use std::path::PathBuf;

use toml::Value;
use url::Url;

use super::tree::scalar_to_string;
use super::ConfigError;

/// A raw property as stored in the tree: a single string or a list of strings.
///
/// Booleans and numbers are not kept natively; they are read back as
/// strings and coerced when accessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    String(String),
    List(Vec<String>),
}

impl PropertyValue {
    /// Converts a tree value. Tables and arrays holding non-scalars yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Table(_) => None,
            scalar => scalar_to_string(scalar).map(Self::String),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::String(_) => None,
            Self::List(items) => Some(items),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Types that can be produced from a [`PropertyValue`].
///
/// `from_property` returns the reason for rejecting the value; the caller
/// attaches the key and raw value.
pub trait FromProperty: Sized {
    /// Human-readable name of the target type, used in error messages.
    const EXPECTED: &'static str;

    fn from_property(value: &PropertyValue) -> Result<Self, String>;
}

fn single(value: &PropertyValue) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| "expected a single value, found a list".to_string())
}

impl FromProperty for String {
    const EXPECTED: &'static str = "string";

    fn from_property(value: &PropertyValue) -> Result<Self, String> {
        single(value).map(str::to_string)
    }
}

/// Case-insensitive `"true"` is true; every other string is false.
impl FromProperty for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_property(value: &PropertyValue) -> Result<Self, String> {
        single(value).map(|s| s.eq_ignore_ascii_case("true"))
    }
}

macro_rules! impl_from_property_int {
    ($($ty:ty),*) => {
        $(
            impl FromProperty for $ty {
                const EXPECTED: &'static str = "integer";

                fn from_property(value: &PropertyValue) -> Result<Self, String> {
                    single(value)?.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )*
    };
}

impl_from_property_int!(i32, i64, u16, u32, u64, usize);

impl FromProperty for Vec<String> {
    const EXPECTED: &'static str = "list";

    fn from_property(value: &PropertyValue) -> Result<Self, String> {
        value
            .as_list()
            .map(<[String]>::to_vec)
            .ok_or_else(|| "expected a list, found a single value".to_string())
    }
}

/// Wraps the raw string; the path is not checked for existence.
impl FromProperty for PathBuf {
    const EXPECTED: &'static str = "file path";

    fn from_property(value: &PropertyValue) -> Result<Self, String> {
        single(value).map(PathBuf::from)
    }
}

impl FromProperty for Url {
    const EXPECTED: &'static str = "URL";

    fn from_property(value: &PropertyValue) -> Result<Self, String> {
        Url::parse(single(value)?).map_err(|e| e.to_string())
    }
}

/// Coerces a resolved tree value into `T`, reporting failures as
/// [`ConfigError::MalformedValue`].
pub(crate) fn coerce<T: FromProperty>(key: &str, value: &Value) -> Result<T, ConfigError> {
    let malformed = |raw: String, reason: String| ConfigError::MalformedValue {
        key: key.to_string(),
        expected: T::EXPECTED,
        raw,
        reason,
    };

    let property = PropertyValue::from_value(value)
        .ok_or_else(|| malformed(value.to_string(), "not a scalar or list of scalars".into()))?;

    T::from_property(&property).map_err(|reason| malformed(property.to_string(), reason))
}
