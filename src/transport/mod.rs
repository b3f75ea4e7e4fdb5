//! Server round trips of the handshake and their wire shapes.
//!
//! Every endpoint answers with the same JSON envelope:
//!
//! ```text
//! { "success": bool, "code": int, "message": string, "data": {...} }
//! ```
//!
//! `ApiResponse::into_result` turns that envelope into a tagged `Result`
//! so callers never inspect the `success` flag themselves.

pub mod http;

use async_trait::async_trait;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::crypto::exchange::parse_decimal;
use crate::crypto::DomainParameters;
use crate::errors::{CredSealError, Result};

pub use http::HttpTransport;

/// The two network calls a handshake needs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the DH prime and generator.
    async fn fetch_params(&self) -> Result<DomainParameters>;

    /// Send our public value, receive the server's.
    async fn exchange(&self, client_public: &BigUint) -> Result<BigUint>;
}

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            code: Some(200),
            message: String::new(),
            data: Some(data),
        }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            message: message.into(),
            data: None,
        }
    }

    /// `success == false` becomes `Server(message)`; a successful
    /// envelope without `data` is malformed.
    pub fn into_result(self) -> Result<T> {
        if !self.success {
            return Err(CredSealError::Server(self.message));
        }
        self.data
            .ok_or_else(|| CredSealError::InvalidResponse("response is missing `data`".into()))
    }
}

/// A big integer sent either as a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Number(serde_json::Number),
    Text(String),
}

impl Decimal {
    pub fn as_decimal_str(&self) -> String {
        match self {
            Decimal::Number(n) => n.to_string(),
            Decimal::Text(s) => s.clone(),
        }
    }
}

/// `data` of the parameter endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamsData {
    /// Hex, no prefix.
    pub prime: String,
    pub generator: Decimal,
}

impl ParamsData {
    pub fn into_params(self) -> Result<DomainParameters> {
        DomainParameters::from_wire(&self.prime, &self.generator.as_decimal_str())
    }
}

/// Body of the exchange request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRequest {
    #[serde(rename = "clientPublic")]
    pub client_public: String,
}

impl ExchangeRequest {
    pub fn new(client_public: &BigUint) -> Self {
        Self {
            client_public: client_public.to_str_radix(10),
        }
    }
}

/// `data` of the exchange endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeData {
    #[serde(rename = "serverPublic")]
    pub server_public: Decimal,
}

impl ExchangeData {
    pub fn server_public(&self) -> Result<BigUint> {
        parse_decimal(&self.server_public.as_decimal_str(), "serverPublic")
    }
}
