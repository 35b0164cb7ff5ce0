//! Template (shape) validation.
//!
//! Every path present in the template must also exist in the config. Extra
//! config keys are allowed. With type checking on, non-blank string leaves of
//! the template are read as type tags and checked against the config value.

use crate::ConfigError;
use crate::tree::{lookup, walk};
use crate::typecheck::TypeSpec;
use log::debug;
use serde_json::Value;

/// Validate `config` against `template`.
///
/// Missing paths are collected over the whole walk and reported together;
/// the first type failure aborts immediately.
pub fn validate_template(
    config: &Value,
    template: &Value,
    do_type_check: bool,
) -> Result<(), ConfigError> {
    let mut missing = Vec::new();
    let mut checked = 0usize;

    for node in walk(template) {
        let path = node.path.to_string();
        let Some(actual) = lookup(config, &node.path) else {
            missing.push(path);
            continue;
        };
        if !do_type_check || !node.is_leaf {
            continue;
        }
        if let Some(spec) = TypeSpec::from_template_leaf(node.value, &path)? {
            spec.check(actual, &path)?;
            checked += 1;
        }
    }

    debug!(
        "template validation finished (missing={}, type_checked={})",
        missing.len(),
        checked
    );
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingKey { paths: missing })
    }
}
