//! Test helpers shared across confgate crates.

pub mod files;
pub mod loader;
pub mod validator;

pub use files::{fixtures_dir, write_source};
pub use loader::InMemoryLoader;
pub use validator::{RecordingValidator, failing_validator};
