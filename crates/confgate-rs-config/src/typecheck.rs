//! Leaf type checks driven by template type tags.

use crate::ConfigError;
use crate::tree::{display_value, type_name};
use serde_json::Value;
use std::fmt;

const ENUM_PREFIX: &str = "enum:";

/// Type declared by a template leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Number,
    Boolean,
    String,
    Array,
    Object,
    /// One of a non-empty set of allowed values.
    Enum(Vec<String>),
}

impl TypeSpec {
    /// Parse a type tag such as `number` or `enum:on,off`.
    ///
    /// Tags are case-insensitive; enum entries are trimmed and blanks dropped.
    pub fn parse(tag: &str, path: &str) -> Result<Self, ConfigError> {
        let trimmed = tag.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if lowered.starts_with(ENUM_PREFIX) {
            let allowed: Vec<String> = trimmed[ENUM_PREFIX.len()..]
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(str::to_string)
                .collect();
            if allowed.is_empty() {
                return Err(unknown_type(tag, path));
            }
            return Ok(TypeSpec::Enum(allowed));
        }
        match lowered.as_str() {
            "number" => Ok(TypeSpec::Number),
            "boolean" => Ok(TypeSpec::Boolean),
            "string" => Ok(TypeSpec::String),
            "array" => Ok(TypeSpec::Array),
            "object" => Ok(TypeSpec::Object),
            _ => Err(unknown_type(tag, path)),
        }
    }

    /// Read the type spec carried by a template leaf, if any.
    ///
    /// Only non-blank string leaves declare a type; other leaves assert presence.
    pub fn from_template_leaf(leaf: &Value, path: &str) -> Result<Option<Self>, ConfigError> {
        match leaf {
            Value::String(tag) if !tag.trim().is_empty() => Self::parse(tag, path).map(Some),
            _ => Ok(None),
        }
    }

    /// Check `value` (found at `path`) against this spec.
    pub fn check(&self, value: &Value, path: &str) -> Result<(), ConfigError> {
        let matches = match self {
            TypeSpec::Number => value.as_f64().is_some_and(f64::is_finite),
            TypeSpec::Boolean => value.is_boolean(),
            TypeSpec::String => value.is_string(),
            TypeSpec::Array => value.is_array(),
            TypeSpec::Object => value.is_object(),
            TypeSpec::Enum(allowed) => {
                return match enum_candidate(value) {
                    Some(candidate) if allowed.iter().any(|entry| *entry == candidate) => Ok(()),
                    _ => Err(ConfigError::EnumMismatch {
                        path: path.to_string(),
                        allowed: allowed.clone(),
                        actual: display_value(value),
                        actual_type: type_name(value).to_string(),
                    }),
                };
            }
        };
        if matches {
            Ok(())
        } else {
            Err(ConfigError::TypeMismatch {
                path: path.to_string(),
                expected: self.to_string(),
                actual: display_value(value),
                actual_type: type_name(value).to_string(),
            })
        }
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Number => f.write_str("a number"),
            TypeSpec::Boolean => f.write_str("boolean"),
            TypeSpec::String => f.write_str("a string"),
            TypeSpec::Array => f.write_str("an array"),
            TypeSpec::Object => f.write_str("an object"),
            TypeSpec::Enum(allowed) => write!(f, "one of [{}]", allowed.join(", ")),
        }
    }
}

/// Parse `tag` and check `value` in one step.
pub fn check(tag: &str, value: &Value, path: &str) -> Result<(), ConfigError> {
    TypeSpec::parse(tag, path)?.check(value, path)
}

/// Scalars compared against enum entries by their string form.
fn enum_candidate(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn unknown_type(tag: &str, path: &str) -> ConfigError {
    ConfigError::UnknownType {
        path: path.to_string(),
        tag: tag.to_string(),
    }
}
