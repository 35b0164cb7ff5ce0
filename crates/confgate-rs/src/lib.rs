//! Public SDK surface for confgate.
//!
//! This crate re-exports the config builder and provides a small
//! initialization helper to keep consumer setup consistent.

pub mod login_info;

/// Re-export for convenience.
pub use confgate_rs_config as config;
pub use confgate_rs_config::{
    BuildParams, ConfigBuilder, ConfigError, ErrorKind, MandatoryRules, build,
};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
