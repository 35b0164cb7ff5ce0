//! Resolution of the current deployment environment name.

use crate::ConfigError;
use std::env;

/// Default variable holding the environment name.
pub const DEFAULT_ENV_VARIABLE: &str = "APP_ENV";

/// Supplies the name of the environment being built for.
pub trait EnvironmentResolver: Send + Sync {
    fn current_environment(&self) -> Result<String, ConfigError>;
}

/// Reads the environment name from a process environment variable,
/// optionally falling back to a second variable when the first is unset.
#[derive(Debug, Clone)]
pub struct ProcessEnvironment {
    variable: String,
    fallback: Option<String>,
}

impl ProcessEnvironment {
    /// Read the environment name from `variable`.
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            fallback: None,
        }
    }

    /// Consult `variable` when the primary variable is unset or blank.
    pub fn with_fallback(mut self, variable: impl Into<String>) -> Self {
        self.fallback = Some(variable.into());
        self
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

impl Default for ProcessEnvironment {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_VARIABLE)
    }
}

fn read_non_blank(variable: &str) -> Option<String> {
    env::var(variable).ok().filter(|name| !name.trim().is_empty())
}

impl EnvironmentResolver for ProcessEnvironment {
    fn current_environment(&self) -> Result<String, ConfigError> {
        read_non_blank(&self.variable)
            .or_else(|| self.fallback.as_deref().and_then(read_non_blank))
            .ok_or_else(|| ConfigError::ConfigLoad(format!("{} is not set!", self.variable)))
    }
}

/// Always resolves to the same environment name.
#[derive(Debug, Clone)]
pub struct FixedEnvironment(pub String);

impl FixedEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl EnvironmentResolver for FixedEnvironment {
    fn current_environment(&self) -> Result<String, ConfigError> {
        Ok(self.0.clone())
    }
}
