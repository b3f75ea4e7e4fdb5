use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::crypto::ExponentPolicy;
use crate::errors::{CredSealError, Result};

/// Client configuration, loaded from `.credseal.toml`.
///
/// Every field has a sensible default so CredSeal works out-of-the-box
/// against a local server without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the server (scheme, host, port).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Path of the DH parameter endpoint (GET).
    #[serde(default = "default_params_path")]
    pub params_path: String,

    /// Path of the public-value exchange endpoint (POST).
    #[serde(default = "default_exchange_path")]
    pub exchange_path: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on a whole handshake in seconds; 0 disables it.
    #[serde(default = "default_handshake_timeout_secs")]
    pub handshake_timeout_secs: u64,

    /// Use a fresh random private exponent per handshake instead of the
    /// legacy constant.
    #[serde(default)]
    pub ephemeral_exponent: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_params_path() -> String {
    "/api/crypto-params".to_string()
}

fn default_exchange_path() -> String {
    "/api/key-exchange".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_handshake_timeout_secs() -> u64 {
    30
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            params_path: default_params_path(),
            exchange_path: default_exchange_path(),
            request_timeout_secs: default_request_timeout_secs(),
            handshake_timeout_secs: default_handshake_timeout_secs(),
            ephemeral_exponent: false,
        }
    }
}

impl Settings {
    /// Name of the config file we look for.
    pub const FILE_NAME: &'static str = ".credseal.toml";

    /// Load settings from `<dir>/.credseal.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CredSealError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.request_timeout_secs == 0 {
            return Err(CredSealError::ConfigError(
                "request_timeout_secs must be at least 1".into(),
            ));
        }

        Ok(settings)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// `None` when the handshake bound is disabled.
    pub fn handshake_timeout(&self) -> Option<Duration> {
        (self.handshake_timeout_secs > 0).then(|| Duration::from_secs(self.handshake_timeout_secs))
    }

    pub fn exponent_policy(&self) -> ExponentPolicy {
        if self.ephemeral_exponent {
            ExponentPolicy::Ephemeral
        } else {
            ExponentPolicy::Fixed
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
