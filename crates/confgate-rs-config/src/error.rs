//! Error types for config loading and validation.

use crate::loader::Format;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a `SourceLoader` for a single source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file does not exist.
    #[error("file '{}' is missing", .path.display())]
    NotFound { path: PathBuf },
    /// Reading the source file failed.
    #[error("failed to read '{}': {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The source could not be parsed in its format.
    #[error("unable to parse {format} '{}': {message}", .path.display())]
    ParseFailed {
        path: PathBuf,
        format: Format,
        message: String,
    },
    /// The file extension does not map to a known format.
    #[error("unsupported config format for '{}'", .path.display())]
    UnsupportedFormat { path: PathBuf },
}

/// Which build input a source was loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRole {
    /// Environment-specific config.
    Env,
    /// Template (schema) file.
    Template,
    /// Environment-independent static config.
    Static,
    /// Build manifest describing the other inputs.
    Manifest,
}

impl fmt::Display for SourceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceRole::Env => "env config",
            SourceRole::Template => "template",
            SourceRole::Static => "static config",
            SourceRole::Manifest => "build manifest",
        };
        f.write_str(name)
    }
}

/// Coarse classification of a `ConfigError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Load,
    ConfigLoad,
    MissingKey,
    MissingValue,
    TypeMismatch,
    UnknownType,
    EnumMismatch,
    InvalidRules,
    CustomValidationFailed,
    Decode,
}

/// Errors returned while building or validating config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Loading one of the build inputs failed.
    #[error("failed to load {role}: {source}")]
    Source {
        role: SourceRole,
        #[source]
        source: LoadError,
    },
    /// The environment or its config mapping could not be resolved.
    #[error("{0}")]
    ConfigLoad(String),
    /// Template paths absent from the config, in template order.
    #[error("Missing keys: {}", .paths.join(", "))]
    MissingKey { paths: Vec<String> },
    /// Mandatory string leaves holding an empty value, in traversal order.
    #[error("Missing values for mandatory keys: {}", .paths.join(", "))]
    MissingValue { paths: Vec<String> },
    /// A leaf does not hold the declared type.
    #[error("Expected '{path}' to be {expected} (instead got '{actual}' of type '{actual_type}')")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
        actual_type: String,
    },
    /// The template declares a type tag that is not recognized.
    #[error("Unknown type '{tag}' at '{path}'")]
    UnknownType { path: String, tag: String },
    /// A leaf is not one of the allowed enum values.
    #[error(
        "Expected '{path}' to be one of [{}] (instead got '{actual}' of type '{actual_type}')",
        .allowed.join(", ")
    )]
    EnumMismatch {
        path: String,
        allowed: Vec<String>,
        actual: String,
        actual_type: String,
    },
    /// The mandatory key rule list is malformed.
    #[error("{0}")]
    InvalidRules(String),
    /// The user-supplied validator rejected the merged config.
    #[error("{0}")]
    CustomValidationFailed(String),
    /// Converting the merged tree into a typed value failed.
    #[error("failed to decode config: {0}")]
    DecodeFailed(#[from] serde_json::Error),
}

impl ConfigError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::Source { .. } => ErrorKind::Load,
            ConfigError::ConfigLoad(_) => ErrorKind::ConfigLoad,
            ConfigError::MissingKey { .. } => ErrorKind::MissingKey,
            ConfigError::MissingValue { .. } => ErrorKind::MissingValue,
            ConfigError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ConfigError::UnknownType { .. } => ErrorKind::UnknownType,
            ConfigError::EnumMismatch { .. } => ErrorKind::EnumMismatch,
            ConfigError::InvalidRules(_) => ErrorKind::InvalidRules,
            ConfigError::CustomValidationFailed(_) => ErrorKind::CustomValidationFailed,
            ConfigError::DecodeFailed(_) => ErrorKind::Decode,
        }
    }

    pub(crate) fn load_failed(role: SourceRole, source: LoadError) -> Self {
        ConfigError::Source { role, source }
    }
}
