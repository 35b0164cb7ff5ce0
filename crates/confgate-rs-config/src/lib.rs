//! Environment-aware configuration building and validation.
//!
//! Loads an environment-specific config and an optional static config,
//! checks the env config against an optional template and mandatory key
//! rules, deep-merges static and env config, and runs an optional
//! caller-supplied validator on the result.

mod builder;
mod environment;
mod error;
mod loader;
mod mandatory;
mod merge;
mod template;
mod tree;
mod typecheck;

/// Config builder, its inputs, and the default-rooted entry point.
pub use builder::{BuildManifest, BuildParams, ConfigBuilder, Validator, build};
/// Environment name resolution.
pub use environment::{
    DEFAULT_ENV_VARIABLE, EnvironmentResolver, FixedEnvironment, ProcessEnvironment,
};
/// Error types returned by loading and validation APIs.
pub use error::{ConfigError, ErrorKind, LoadError, SourceRole};
/// Source loading.
pub use loader::{FileSourceLoader, Format, SourceLoader};
/// Mandatory key rules.
pub use mandatory::{MandatoryRule, MandatoryRules, Resolution, validate_mandatory_keys};
/// Deep merge of static and env config.
pub use merge::merge_configs;
/// Template validation.
pub use template::validate_template;
/// Tree model and traversal.
pub use tree::{ConfigTree, KeyPath, Node, Segment, Walk, is_leaf, lookup, walk, walk_leaves};
/// Leaf type checks.
pub use typecheck::{TypeSpec, check as check_type};
