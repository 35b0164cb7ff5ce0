use confgate_rs_config::Validator;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Validator that records each config it is called with.
#[derive(Debug, Clone, Default)]
pub struct RecordingValidator {
    seen: Arc<Mutex<Vec<Value>>>,
    reject_with: Option<String>,
}

impl RecordingValidator {
    /// Accepts every config.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Rejects every config with `message`.
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            seen: Arc::default(),
            reject_with: Some(message.into()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn seen(&self) -> Vec<Value> {
        self.seen.lock().clone()
    }

    /// Boxed validator sharing this recorder's state.
    pub fn validator(&self) -> Validator {
        let seen = self.seen.clone();
        let reject_with = self.reject_with.clone();
        Box::new(move |config: &Value| {
            seen.lock().push(config.clone());
            match &reject_with {
                Some(message) => Err(anyhow::anyhow!("{message}")),
                None => Ok(()),
            }
        })
    }
}

/// Validator that always fails with `message`.
pub fn failing_validator(message: &'static str) -> Validator {
    Box::new(move |_: &Value| Err(anyhow::anyhow!(message)))
}
