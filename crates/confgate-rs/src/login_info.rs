//! Base64 transport encoding for login credentials.
//!
//! Credentials are serialized as `{"userName": ..., "password": ...}` and
//! encoded with the standard base64 alphabet.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned while decoding login info.
#[derive(Debug, Error)]
pub enum LoginInfoError {
    /// Input was not valid base64.
    #[error("invalid base64 login info: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Decoded bytes were not the expected JSON document.
    #[error("invalid login info payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Username/password pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInfo {
    pub user_name: String,
    pub password: String,
}

impl LoginInfo {
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
        }
    }

    /// Encode as base64 JSON.
    pub fn encode(&self) -> String {
        // Serializing two strings cannot fail.
        let payload = serde_json::to_vec(self).unwrap_or_default();
        STANDARD.encode(payload)
    }

    /// Decode base64 JSON produced by `encode`.
    pub fn decode(encoded: &str) -> Result<Self, LoginInfoError> {
        let bytes = STANDARD.decode(encoded.trim())?;
        let info = serde_json::from_slice(&bytes)?;
        debug!("decoded login info (len={})", encoded.len());
        Ok(info)
    }
}

/// Encode a username/password pair.
pub fn encode(user_name: &str, password: &str) -> String {
    LoginInfo::new(user_name, password).encode()
}

/// Decode an encoded username/password pair.
pub fn decode(encoded: &str) -> Result<LoginInfo, LoginInfoError> {
    LoginInfo::decode(encoded)
}
