use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// All errors that can occur in CredSeal.
///
/// The enum is `Clone` so a single failed handshake can hand the same
/// error to every caller that was waiting on it.
#[derive(Debug, Clone, Error)]
pub enum CredSealError {
    // --- Handshake errors ---
    #[error("Server rejected the request: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Handshake timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),

    // --- Crypto errors ---
    #[error("Key derivation failed: {0}")]
    Derivation(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — wrong session key or corrupted data")]
    DecryptionFailed,

    // --- Caller errors ---
    #[error("Type error: {0}")]
    Type(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl From<std::io::Error> for CredSealError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(Arc::new(e))
    }
}

impl From<reqwest::Error> for CredSealError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}

/// Convenience type alias for CredSeal results.
pub type Result<T> = std::result::Result<T, CredSealError>;
