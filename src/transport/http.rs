//! `reqwest`-backed transport talking to the real server endpoints.

use std::time::Duration;

use async_trait::async_trait;
use num_bigint::BigUint;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiResponse, ExchangeData, ExchangeRequest, ParamsData, Transport};
use crate::config::Settings;
use crate::crypto::DomainParameters;
use crate::errors::{CredSealError, Result};

/// HTTP client for the parameter and exchange endpoints.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    params_url: String,
    exchange_url: String,
}

impl HttpTransport {
    /// Build a transport for `base_url` with the given endpoint paths.
    pub fn new(
        base_url: &str,
        params_path: &str,
        exchange_path: &str,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(request_timeout).build()?;

        let base = base_url.trim_end_matches('/');
        Ok(Self {
            client,
            params_url: join_url(base, params_path),
            exchange_url: join_url(base, exchange_path),
        })
    }

    /// Build a transport from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            &settings.server_url,
            &settings.params_path,
            &settings.exchange_path,
            settings.request_timeout(),
        )
    }

    pub fn params_url(&self) -> &str {
        &self.params_url
    }

    pub fn exchange_url(&self) -> &str {
        &self.exchange_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_params(&self) -> Result<DomainParameters> {
        debug!("GET {}", self.params_url);
        let response = self.client.get(&self.params_url).send().await?;

        let data: ParamsData = read_envelope(response).await?;
        data.into_params()
    }

    async fn exchange(&self, client_public: &BigUint) -> Result<BigUint> {
        debug!("POST {}", self.exchange_url);
        let response = self
            .client
            .post(&self.exchange_url)
            .json(&ExchangeRequest::new(client_public))
            .send()
            .await?;

        let data: ExchangeData = read_envelope(response).await?;
        data.server_public()
    }
}

/// Decode the JSON envelope whatever the HTTP status; the server reports
/// failures as non-2xx responses carrying `success: false`.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;

    let envelope: ApiResponse<T> = serde_json::from_slice(&body).map_err(|e| {
        CredSealError::InvalidResponse(format!("HTTP {status}: body is not an API envelope: {e}"))
    })?;

    envelope.into_result()
}

fn join_url(base: &str, path: &str) -> String {
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
