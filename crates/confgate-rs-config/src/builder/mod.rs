//! Environment-aware config builder.
//!
//! Resolves the current environment, loads the env/template/static sources,
//! validates the env config against the template and mandatory key rules,
//! merges static and env config (env wins), then runs the caller's validator
//! on the merged result. The first failure aborts the build.

mod manifest;

pub use manifest::BuildManifest;

use crate::environment::{EnvironmentResolver, ProcessEnvironment};
use crate::loader::{FileSourceLoader, SourceLoader};
use crate::mandatory::{MandatoryRules, validate_mandatory_keys};
use crate::merge::merge_configs;
use crate::template::validate_template;
use crate::{ConfigError, LoadError, SourceRole};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Caller-supplied check run once on the merged config.
pub type Validator = Box<dyn Fn(&Value) -> anyhow::Result<()> + Send + Sync>;

const CUSTOM_VALIDATION_FAILED: &str = "Custom validation failed";

/// Inputs for a single build.
#[derive(Default)]
pub struct BuildParams {
    /// Environment name -> env config source.
    pub env_config: BTreeMap<String, PathBuf>,
    /// Optional template the env config must satisfy.
    pub template_file: Option<PathBuf>,
    /// Optional environment-independent config, overridden by env config.
    pub static_config: Option<PathBuf>,
    /// Optional rules selecting leaves that must hold non-empty strings.
    pub mandatory_keys: Option<MandatoryRules>,
    /// Optional validator run on the merged config.
    pub validate: Option<Validator>,
    /// Check template type tags against env config values.
    pub do_type_validation: bool,
}

impl BuildParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the config source used when running in `env`.
    pub fn with_env_config(mut self, env: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.env_config
            .insert(env.into(), path.as_ref().to_path_buf());
        self
    }

    pub fn with_template(mut self, path: impl AsRef<Path>) -> Self {
        self.template_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_static_config(mut self, path: impl AsRef<Path>) -> Self {
        self.static_config = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_mandatory_keys(mut self, rules: MandatoryRules) -> Self {
        self.mandatory_keys = Some(rules);
        self
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.validate = Some(Box::new(validate));
        self
    }

    pub fn with_type_validation(mut self, enabled: bool) -> Self {
        self.do_type_validation = enabled;
        self
    }
}

impl fmt::Debug for BuildParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildParams")
            .field("env_config", &self.env_config)
            .field("template_file", &self.template_file)
            .field("static_config", &self.static_config)
            .field("mandatory_keys", &self.mandatory_keys)
            .field("validate", &self.validate.as_ref().map(|_| "<fn>"))
            .field("do_type_validation", &self.do_type_validation)
            .finish()
    }
}

/// Builds validated config trees from a loader and an environment resolver.
pub struct ConfigBuilder {
    loader: Box<dyn SourceLoader>,
    environment: Box<dyn EnvironmentResolver>,
}

impl ConfigBuilder {
    /// File-backed builder resolving sources against `root`, reading the
    /// environment name from `APP_ENV`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            loader: Box::new(FileSourceLoader::new(root)),
            environment: Box::new(ProcessEnvironment::default()),
        }
    }

    pub fn with_loader(mut self, loader: impl SourceLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_environment(mut self, environment: impl EnvironmentResolver + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Run the full pipeline and return the merged config.
    pub fn build(&self, params: &BuildParams) -> Result<Value, ConfigError> {
        let env = self.environment.current_environment()?;
        info!("building config (env={env})");

        let env_config = self.load_env_config(params, &env)?;
        let template = self.load_optional(SourceRole::Template, params.template_file.as_deref())?;
        let static_config =
            self.load_optional(SourceRole::Static, params.static_config.as_deref())?;

        validate_template(&env_config, &template, params.do_type_validation)?;
        if let Some(rules) = &params.mandatory_keys {
            validate_mandatory_keys(&env_config, rules)?;
        }

        let merged = merge_configs(&static_config, &env_config);
        debug!("merged static and env config (env={env})");

        if let Some(validate) = &params.validate {
            run_validator(validate, &merged)?;
        }

        info!("config built (env={env})");
        Ok(merged)
    }

    /// Build and deserialize the merged config into `T`.
    pub fn build_as<T: DeserializeOwned>(&self, params: &BuildParams) -> Result<T, ConfigError> {
        let value = self.build(params)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Load build params from a manifest file (JSON, JSON5, YAML, or TOML).
    ///
    /// Paths inside the manifest are resolved by this builder's loader, like
    /// any other source.
    pub fn load_manifest(&self, path: impl AsRef<Path>) -> Result<BuildParams, ConfigError> {
        let path = path.as_ref();
        debug!("loading build manifest (path={})", path.display());
        let value = self
            .loader
            .load(path)
            .map_err(|err| ConfigError::load_failed(SourceRole::Manifest, err))?;
        BuildManifest::from_value(value)?.into_params()
    }

    fn load_env_config(&self, params: &BuildParams, env: &str) -> Result<Value, ConfigError> {
        if params.env_config.is_empty() {
            return Err(ConfigError::ConfigLoad(
                "env config mapping is mandatory".to_string(),
            ));
        }
        let Some(path) = params.env_config.get(env) else {
            return Err(ConfigError::ConfigLoad(format!(
                "There is no config path for ENV={env}"
            )));
        };
        self.load_source(SourceRole::Env, path)
    }

    fn load_optional(&self, role: SourceRole, path: Option<&Path>) -> Result<Value, ConfigError> {
        match path {
            Some(path) => self.load_source(role, path),
            None => {
                debug!("no {role} supplied; using an empty mapping");
                Ok(Value::Object(Map::new()))
            }
        }
    }

    fn load_source(&self, role: SourceRole, path: &Path) -> Result<Value, ConfigError> {
        debug!("loading {role} (path={})", path.display());
        self.loader.load(path).map_err(|err| {
            if let LoadError::NotFound { .. } = err {
                warn!("{role} '{}' is missing", path.display());
            }
            ConfigError::load_failed(role, err)
        })
    }
}

impl fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigBuilder").finish_non_exhaustive()
    }
}

/// Build with a file loader rooted at the working directory and `APP_ENV`.
pub fn build(params: &BuildParams) -> Result<Value, ConfigError> {
    ConfigBuilder::new(".").build(params)
}

fn run_validator(validate: &Validator, merged: &Value) -> Result<(), ConfigError> {
    validate(merged).map_err(|err| {
        let message = err.to_string();
        debug!("custom validation failed: {message}");
        if message.trim().is_empty() {
            ConfigError::CustomValidationFailed(CUSTOM_VALIDATION_FAILED.to_string())
        } else {
            ConfigError::CustomValidationFailed(message)
        }
    })
}
