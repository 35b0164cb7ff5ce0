//! Declarative build inputs loaded from a file.

use super::BuildParams;
use crate::loader::{FileSourceLoader, Format};
use crate::mandatory::MandatoryRules;
use crate::{ConfigError, SourceRole};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Serialized form of `BuildParams`, minus the custom validator.
///
/// `mandatoryKeys` is kept untyped so a malformed rule list is reported as
/// `InvalidRules` rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildManifest {
    #[serde(default)]
    pub env_config: BTreeMap<String, PathBuf>,
    #[serde(default)]
    pub template_file: Option<PathBuf>,
    #[serde(default)]
    pub static_config: Option<PathBuf>,
    #[serde(default)]
    pub mandatory_keys: Option<Value>,
    #[serde(default)]
    pub do_type_validation: bool,
}

impl BuildManifest {
    /// Decode a manifest from an already-parsed tree.
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a manifest from JSON5 text.
    pub fn from_json5(contents: &str) -> Result<Self, ConfigError> {
        let value = FileSourceLoader::load_str(Format::Json5, contents)
            .map_err(|err| ConfigError::load_failed(SourceRole::Manifest, err))?;
        Self::from_value(value)
    }

    /// Convert into build params, validating the mandatory key rules.
    pub fn into_params(self) -> Result<BuildParams, ConfigError> {
        let mandatory_keys = self
            .mandatory_keys
            .as_ref()
            .map(MandatoryRules::from_value)
            .transpose()?;
        Ok(BuildParams {
            env_config: self.env_config,
            template_file: self.template_file,
            static_config: self.static_config,
            mandatory_keys,
            validate: None,
            do_type_validation: self.do_type_validation,
        })
    }
}
