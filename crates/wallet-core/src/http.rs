//! REST client for the blockchain metadata API.
//!
//! Responses are wrapped as `{ success, message, network, data }`. Numeric
//! fields may arrive as JSON numbers, decimal strings or `0x` hex strings.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::config::ApiConfig;
use crate::error::WalletError;
use crate::metadata::{ChainMetadataProvider, FeeData};
use crate::types::{Mode, Network};

const NONCE_PATH: &str = "/api/blockchain/nonce";
const FEE_DATA_PATH: &str = "/api/blockchain/feeData";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("API reported failure: {0}")]
    Rejected(String),

    #[error("Malformed API response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ApiError {
    /// Transport failures and server-side statuses are worth another try.
    /// Client errors and explicit rejections are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { status, .. } => !matches!(*status, 400 | 401 | 404),
            ApiError::Rejected(_) | ApiError::Decode(_) | ApiError::Config(_) => false,
        }
    }
}

impl From<ApiError> for WalletError {
    fn from(e: ApiError) -> Self {
        WalletError::Metadata(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Client for the metadata API, usable as a [`ChainMetadataProvider`]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    /// Client configured from `cryptowebapi.*` and `CRYPTOWEBAPI__*`
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::load()?)
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Next nonce for `address`
    #[instrument(skip(self, network, mode), fields(network = %network, mode = %mode))]
    pub async fn fetch_nonce(&self, network: Network, address: &str, mode: Mode) -> Result<u64, ApiError> {
        let data = self
            .get_with_retry(
                NONCE_PATH,
                &[
                    ("network", network.as_str()),
                    ("address", address),
                    ("mode", mode.as_str()),
                ],
            )
            .await?;

        let nonce = quantity(&data, "nonce")?.ok_or_else(|| ApiError::Decode("missing nonce".into()))?;
        u64::try_from(nonce).map_err(|_| ApiError::Decode(format!("nonce {nonce} out of range")))
    }

    /// Current gas price, plus EIP-1559 caps when the network reports them
    #[instrument(skip(self, network, mode), fields(network = %network, mode = %mode))]
    pub async fn fetch_fee_data(&self, network: Network, mode: Mode) -> Result<FeeData, ApiError> {
        let data = self
            .get_with_retry(FEE_DATA_PATH, &[("network", network.as_str()), ("mode", mode.as_str())])
            .await?;
        parse_fee_data(&data)
    }

    async fn get_with_retry(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = self.config.endpoint(path);
        let attempts = self.config.retry_attempts.max(1);

        let mut attempt = 1;
        loop {
            match self.get_once(&url, query).await {
                Ok(data) => return Ok(data),
                Err(e) if attempt < attempts && e.is_retryable() => {
                    let delay = backoff_delay(self.config.retry_delay_ms, attempt);
                    warn!(%url, attempt, attempts, ?delay, error = %e, "API request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_once(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, ApiError> {
        let mut request = self.http.get(url).query(query);
        if let Some(api_key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(%url, success = envelope.success, "API response");
        unwrap_envelope(envelope)
    }
}

#[async_trait]
impl ChainMetadataProvider for ApiClient {
    async fn get_nonce(&self, network: Network, address: &str, mode: Mode) -> Result<u64, WalletError> {
        Ok(self.fetch_nonce(network, address, mode).await?)
    }

    async fn get_fee_data(&self, network: Network, mode: Mode) -> Result<FeeData, WalletError> {
        Ok(self.fetch_fee_data(network, mode).await?)
    }
}

/// Wait before retry number `attempt` (1-based): `base * 2^(attempt - 1)`
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_ms.saturating_mul(factor))
}

fn unwrap_envelope(envelope: Envelope) -> Result<Value, ApiError> {
    if !envelope.success {
        return Err(ApiError::Rejected(
            envelope.message.unwrap_or_else(|| "request unsuccessful".into()),
        ));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::Decode("response has no data".into()))
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string())
}

fn parse_fee_data(data: &Value) -> Result<FeeData, ApiError> {
    Ok(FeeData {
        gas_price: quantity(data, "gasPrice")?
            .ok_or_else(|| ApiError::Decode("missing gasPrice".into()))?,
        max_fee_per_gas: quantity(data, "maxFeePerGas")?,
        max_priority_fee_per_gas: quantity(data, "maxPriorityFeePerGas")?,
    })
}

/// Reads `data[field]` as an unsigned integer. Absent or null is `None`.
fn quantity(data: &Value, field: &str) -> Result<Option<u128>, ApiError> {
    let bad = |raw: &dyn std::fmt::Display| ApiError::Decode(format!("{field}: `{raw}` is not an unsigned integer"));

    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(|v| Some(v as u128)).ok_or_else(|| bad(n)),
        Some(Value::String(s)) => {
            let s = s.trim();
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u128::from_str_radix(hex, 16),
                None => s.parse::<u128>(),
            };
            parsed.map(Some).map_err(|_| bad(&s))
        }
        Some(other) => Err(bad(other)),
    }
}
