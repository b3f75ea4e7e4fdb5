//! Entry point for sealing form fields before they leave the client.
//!
//! Every call obtains the session key from the coordinator (joining an
//! in-flight handshake when one is running), then encrypts under a fresh
//! salt. Nothing is cached between calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Settings;
use crate::crypto;
use crate::errors::{CredSealError, Result};
use crate::handshake::HandshakeCoordinator;

/// Encrypts strings for transmission.
#[derive(Clone)]
pub struct Encryptor {
    coordinator: HandshakeCoordinator,
}

/// Encrypted `username`/`password` pair, serialized as the body of a
/// register or login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedCredentials {
    pub username: String,
    pub password: String,
}

impl Encryptor {
    pub fn new(coordinator: HandshakeCoordinator) -> Self {
        Self { coordinator }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(HandshakeCoordinator::from_settings(settings)?))
    }

    pub fn coordinator(&self) -> &HandshakeCoordinator {
        &self.coordinator
    }

    /// Encrypt `plaintext` into a base64 `Salted__` blob.
    pub async fn encrypt(&self, plaintext: &str) -> Result<String> {
        let session_key = self.coordinator.obtain_session_key().await?;
        debug!(len = plaintext.len(), "encrypting field");
        crypto::encrypt(&session_key, plaintext.as_bytes())
    }

    /// Encrypt a dynamically-typed value, which must be a JSON string.
    ///
    /// Anything else fails with `Type` before any network activity.
    pub async fn encrypt_value(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => self.encrypt(s).await,
            other => Err(CredSealError::Type(format!(
                "encrypt expects a string, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Encrypt both credentials concurrently; they share one handshake.
    pub async fn encrypt_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<EncryptedCredentials> {
        let (username, password) =
            futures::try_join!(self.encrypt(username), self.encrypt(password))?;
        Ok(EncryptedCredentials { username, password })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
