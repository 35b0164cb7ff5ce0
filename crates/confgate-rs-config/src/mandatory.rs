//! Mandatory key rules and the non-empty value check.
//!
//! Rules are `*` (every leaf), an exact dotted path, or `-path` to exclude an
//! exact path. Resolution is per leaf: exclusion beats an exact match, which
//! beats the wildcard, independent of rule order.

use crate::ConfigError;
use crate::tree::walk_leaves;
use log::debug;
use serde_json::Value;
use std::collections::HashSet;

const WILDCARD: &str = "*";
const EXCLUDE_PREFIX: char = '-';
const INVALID_RULES: &str = "Invalid mandatory keys parameters. Expected array of strings!";

/// A single mandatory key directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MandatoryRule {
    /// `*`: every leaf is mandatory.
    All,
    /// An exact dotted leaf path.
    Exact(String),
    /// `-path`: never mandatory.
    Exclude(String),
}

impl MandatoryRule {
    /// Parse one rule string.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        if raw == WILDCARD {
            return Ok(MandatoryRule::All);
        }
        match raw.strip_prefix(EXCLUDE_PREFIX) {
            Some("") => Err(ConfigError::InvalidRules(format!(
                "mandatory key rule '{raw}' is missing a path"
            ))),
            Some(path) => Ok(MandatoryRule::Exclude(path.to_string())),
            None if raw.is_empty() => Err(ConfigError::InvalidRules(
                "mandatory key rule must not be empty".to_string(),
            )),
            None => Ok(MandatoryRule::Exact(raw.to_string())),
        }
    }
}

/// How a leaf path resolves against a rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Excluded,
    Mandatory,
    Optional,
}

/// An ordered, parsed list of mandatory key rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MandatoryRules {
    rules: Vec<MandatoryRule>,
    wildcard: bool,
    exact: HashSet<String>,
    excluded: HashSet<String>,
}

impl MandatoryRules {
    /// Parse a list of rule strings.
    pub fn new<I, S>(raw: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = Self::default();
        for entry in raw {
            rules.push(MandatoryRule::parse(entry.as_ref())?);
        }
        Ok(rules)
    }

    /// Parse rules from an untyped value, which must be an array of strings.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        let Value::Array(entries) = value else {
            return Err(ConfigError::InvalidRules(INVALID_RULES.to_string()));
        };
        let mut rules = Self::default();
        for entry in entries {
            let Some(raw) = entry.as_str() else {
                return Err(ConfigError::InvalidRules(INVALID_RULES.to_string()));
            };
            rules.push(MandatoryRule::parse(raw)?);
        }
        Ok(rules)
    }

    fn push(&mut self, rule: MandatoryRule) {
        match &rule {
            MandatoryRule::All => self.wildcard = true,
            MandatoryRule::Exact(path) => {
                self.exact.insert(path.clone());
            }
            MandatoryRule::Exclude(path) => {
                self.excluded.insert(path.clone());
            }
        }
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[MandatoryRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a dotted leaf path: exclusion > exact > wildcard.
    pub fn resolve(&self, path: &str) -> Resolution {
        if self.excluded.contains(path) {
            Resolution::Excluded
        } else if self.exact.contains(path) || self.wildcard {
            Resolution::Mandatory
        } else {
            Resolution::Optional
        }
    }
}

/// Check every mandatory string leaf of `config` holds a non-blank value.
///
/// Only string leaves can be reported; numbers, booleans, nulls and empty
/// containers always pass.
pub fn validate_mandatory_keys(config: &Value, rules: &MandatoryRules) -> Result<(), ConfigError> {
    if rules.is_empty() {
        return Ok(());
    }

    let missing: Vec<String> = walk_leaves(config)
        .filter_map(|node| {
            let path = node.path.to_string();
            if rules.resolve(&path) != Resolution::Mandatory {
                return None;
            }
            match node.value {
                Value::String(text) if text.trim().is_empty() => Some(path),
                _ => None,
            }
        })
        .collect();

    debug!(
        "mandatory key validation finished (rules={}, missing={})",
        rules.rules().len(),
        missing.len()
    );
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingValue { paths: missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Value {
        json!({ "a": "a", "d": { "f": { "g": "" } } })
    }

    #[test]
    fn wildcard_with_exclusion_passes() {
        let rules = MandatoryRules::new(["*", "-d.f.g"]).unwrap();
        assert!(validate_mandatory_keys(&sample(), &rules).is_ok());
    }

    #[test]
    fn exclusion_wins_regardless_of_order() {
        let rules = MandatoryRules::new(["-d.f.g", "d.f.g", "*"]).unwrap();
        assert!(validate_mandatory_keys(&sample(), &rules).is_ok());
    }

    #[test]
    fn wildcard_alone_reports_empty_leaf() {
        let rules = MandatoryRules::new(["*"]).unwrap();
        let err = validate_mandatory_keys(&sample(), &rules).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingValue);
        assert_eq!(err.to_string(), "Missing values for mandatory keys: d.f.g");
    }

    #[test]
    fn exact_rule_reports_empty_leaf() {
        let rules = MandatoryRules::new(["d.f.g"]).unwrap();
        let err = validate_mandatory_keys(&sample(), &rules).unwrap_err();
        assert_eq!(err.to_string(), "Missing values for mandatory keys: d.f.g");
    }

    #[test]
    fn whitespace_only_strings_count_as_empty() {
        let config = json!({ "a": "  ", "b": "\t", "c": "ok" });
        let rules = MandatoryRules::new(["*"]).unwrap();
        let err = validate_mandatory_keys(&config, &rules).unwrap_err();
        assert_eq!(err.to_string(), "Missing values for mandatory keys: a, b");
    }

    #[test]
    fn non_string_leaves_are_never_missing() {
        let config = json!({ "n": 0, "b": false, "z": null, "o": {}, "l": [] });
        let rules = MandatoryRules::new(["*"]).unwrap();
        assert!(validate_mandatory_keys(&config, &rules).is_ok());
    }

    #[test]
    fn excluding_a_branch_does_not_exclude_its_leaves() {
        let rules = MandatoryRules::new(["*", "-d.f"]).unwrap();
        assert!(validate_mandatory_keys(&sample(), &rules).is_err());
    }

    #[test]
    fn empty_rule_list_is_a_no_op() {
        let rules = MandatoryRules::new(Vec::<String>::new()).unwrap();
        assert!(validate_mandatory_keys(&sample(), &rules).is_ok());
    }

    #[test]
    fn resolution_precedence() {
        let rules = MandatoryRules::new(["*", "a", "-a", "b"]).unwrap();
        assert_eq!(rules.resolve("a"), Resolution::Excluded);
        assert_eq!(rules.resolve("b"), Resolution::Mandatory);
        assert_eq!(rules.resolve("c"), Resolution::Mandatory);

        let exact_only = MandatoryRules::new(["b"]).unwrap();
        assert_eq!(exact_only.resolve("c"), Resolution::Optional);
    }

    #[test]
    fn from_value_rejects_non_string_lists() {
        let err = MandatoryRules::from_value(&json!("*")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRules);
        let err = MandatoryRules::from_value(&json!(["*", 3])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRules);
        let rules = MandatoryRules::from_value(&json!(["*", "-a.b"])).unwrap();
        assert_eq!(
            rules.rules(),
            &[MandatoryRule::All, MandatoryRule::Exclude("a.b".to_string())]
        );
    }

    #[test]
    fn malformed_rule_strings_are_rejected() {
        assert!(MandatoryRule::parse("").is_err());
        assert!(MandatoryRule::parse("-").is_err());
    }
}
