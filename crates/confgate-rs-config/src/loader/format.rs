//! Source formats and their parsers.

use crate::LoadError;
use crate::tree::{KeyPath, Segment};
use serde_json::{Map, Number, Value};
use std::fmt;
use std::path::Path;

/// Serialization format of a config source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Json5,
    Yaml,
    Toml,
}

impl Format {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "json5" => Some(Format::Json5),
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }

    /// Parse `contents` into a config tree. `path` is only used for errors.
    ///
    /// The document root must be a mapping; an empty (null) document is
    /// read as an empty mapping.
    pub fn parse(self, contents: &str, path: &Path) -> Result<Value, LoadError> {
        let parsed = match self {
            Format::Json => serde_json::from_str::<Value>(contents).map_err(|err| err.to_string()),
            Format::Json5 => json5::from_str::<Value>(contents).map_err(|err| err.to_string()),
            Format::Yaml => serde_yaml::from_str::<serde_yaml::Value>(contents)
                .map_err(|err| err.to_string())
                .and_then(|value| yaml_to_json(&value, &KeyPath::root())),
            Format::Toml => toml::from_str::<toml::Table>(contents)
                .map_err(|err| err.to_string())
                .and_then(|table| toml_table_to_json(table, &KeyPath::root())),
        };
        let parse_failed = |message: String| LoadError::ParseFailed {
            path: path.to_path_buf(),
            format: self,
            message,
        };
        match parsed.map_err(parse_failed)? {
            Value::Object(map) => Ok(Value::Object(map)),
            Value::Null => Ok(Value::Object(Map::new())),
            _ => Err(parse_failed(
                "top-level value must be a mapping".to_string(),
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Json => "JSON",
            Format::Json5 => "JSON5",
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
        };
        f.write_str(name)
    }
}

/// TOML datetimes become their RFC 3339 string; tables keep file order.
fn toml_to_json(value: toml::Value, path: &KeyPath) -> Result<Value, String> {
    Ok(match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::Number(number.into()),
        toml::Value::Float(number) => Value::Number(finite_number(number, path)?),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| toml_to_json(item, &path.child(Segment::Index(index))))
                .collect::<Result<_, _>>()?,
        ),
        toml::Value::Table(table) => toml_table_to_json(table, path)?,
    })
}

fn toml_table_to_json(table: toml::Table, path: &KeyPath) -> Result<Value, String> {
    let mut map = Map::with_capacity(table.len());
    for (key, value) in table {
        let converted = toml_to_json(value, &path.child(Segment::Key(key.clone())))?;
        map.insert(key, converted);
    }
    Ok(Value::Object(map))
}

/// Tags are dropped in favour of the tagged value. Scalar keys are
/// stringified; sequence or mapping keys are rejected.
fn yaml_to_json(value: &serde_yaml::Value, path: &KeyPath) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(flag) => Value::Bool(*flag),
        Yaml::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::Number(int.into())
            } else if let Some(uint) = number.as_u64() {
                Value::Number(uint.into())
            } else {
                let float = number
                    .as_f64()
                    .ok_or_else(|| format!("unrepresentable number at '{path}'"))?;
                Value::Number(finite_number(float, path)?)
            }
        }
        Yaml::String(text) => Value::String(text.clone()),
        Yaml::Sequence(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(index, item)| yaml_to_json(item, &path.child(Segment::Index(index))))
                .collect::<Result<_, _>>()?,
        ),
        Yaml::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = match key {
                    Yaml::String(text) => text.clone(),
                    Yaml::Number(number) => number.to_string(),
                    Yaml::Bool(flag) => flag.to_string(),
                    _ => return Err(format!("unsupported mapping key under '{path}'")),
                };
                let converted = yaml_to_json(item, &path.child(Segment::Key(key.clone())))?;
                map.insert(key, converted);
            }
            Value::Object(map)
        }
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value, path)?,
    })
}

fn finite_number(float: f64, path: &KeyPath) -> Result<Number, String> {
    Number::from_f64(float).ok_or_else(|| format!("non-finite number at '{path}'"))
}
