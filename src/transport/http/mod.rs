use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::Response;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::error::{ConfigError, GatewayError};
use crate::core::types::{AdapterContext, ProviderId};

pub(crate) const AUTH_BEARER_TOKEN_KEY: &str = "transport.auth.bearer_token";
const REQUEST_ID_HEADER_KEY: &str = "transport.request_id_header";
const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

/// Transport-level resend policy for transient HTTP failures.
///
/// This sits below the pipeline: a request retried here is still one gateway
/// call from the pipeline's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub retryable_status_codes: Vec<u16>,
}

impl RetryPolicy {
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_attempts must be >= 1".to_string(),
            });
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_backoff_ms must be >= initial_backoff_ms".to_string(),
            });
        }
        if let Some(status) = self
            .retryable_status_codes
            .iter()
            .copied()
            .find(|status| !(100..=599).contains(status))
        {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!("retryable status code must be in 100..=599: {status}"),
            });
        }
        Ok(())
    }

    fn should_retry_status(&self, status_code: u16) -> bool {
        self.retryable_status_codes.contains(&status_code)
    }

    fn backoff_for_retry(&self, retry_index: u32) -> Duration {
        let multiplier = 1_u64.checked_shl(retry_index.min(63)).unwrap_or(u64::MAX);
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(multiplier)
                .min(self.max_backoff_ms),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 100,
            max_backoff_ms: 2_000,
            retryable_status_codes: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

/// JSON-over-HTTP client shared by the provider adapters. Each request gets
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    retry_policy: RetryPolicy,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64, retry_policy: RetryPolicy) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), timeout_ms, retry_policy)
    }

    pub fn with_client(
        client: reqwest::Client,
        timeout_ms: u64,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }
        retry_policy.validate()?;

        Ok(Self {
            client,
            retry_policy,
            timeout_ms,
        })
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub async fn post_json<TReq, TResp>(
        &self,
        provider: ProviderId,
        model: Option<&str>,
        url: &str,
        body: &TReq,
        ctx: &AdapterContext,
    ) -> Result<TResp, GatewayError>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|error| GatewayError::Serialization {
            provider,
            model: model.map(str::to_string),
            request_id: None,
            message: error.to_string(),
        })?;
        let headers = self.build_headers(provider, model, ctx)?;
        let request_id_header = resolve_request_id_header(provider, model, ctx)?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(?provider, model, url, attempt, "sending gateway request");

            let sent = self
                .client
                .post(url)
                .timeout(Duration::from_millis(self.timeout_ms))
                .headers(headers.clone())
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(payload.clone())
                .send()
                .await;

            let response = match sent {
                Ok(response) => response,
                Err(error) => {
                    if attempt < self.retry_policy.max_attempts && is_retryable_transport(&error) {
                        warn!(?provider, attempt, %error, "transport failure, resending");
                        self.sleep_before_retry(attempt).await;
                        continue;
                    }
                    return Err(GatewayError::Transport {
                        provider,
                        model: model.map(str::to_string),
                        message: error.to_string(),
                    });
                }
            };

            let status_code = response.status().as_u16();
            let request_id = response
                .headers()
                .get(&request_id_header)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);

            if !response.status().is_success() {
                let status_error =
                    status_error(provider, model, status_code, request_id, response).await;
                if attempt < self.retry_policy.max_attempts
                    && self.retry_policy.should_retry_status(status_code)
                {
                    warn!(?provider, attempt, status_code, "transient status, resending");
                    self.sleep_before_retry(attempt).await;
                    continue;
                }
                return Err(status_error);
            }

            return response
                .json::<TResp>()
                .await
                .map_err(|error| GatewayError::Serialization {
                    provider,
                    model: model.map(str::to_string),
                    request_id,
                    message: error.to_string(),
                });
        }
    }

    fn build_headers(
        &self,
        provider: ProviderId,
        model: Option<&str>,
        ctx: &AdapterContext,
    ) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = ctx.metadata.get(AUTH_BEARER_TOKEN_KEY) {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
                GatewayError::Protocol {
                    provider,
                    model: model.map(str::to_string),
                    request_id: None,
                    message: format!("invalid bearer token header value: {error}"),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    async fn sleep_before_retry(&self, attempt: u32) {
        let backoff = self
            .retry_policy
            .backoff_for_retry(attempt.saturating_sub(1));
        tokio::time::sleep(backoff).await;
    }
}

fn resolve_request_id_header(
    provider: ProviderId,
    model: Option<&str>,
    ctx: &AdapterContext,
) -> Result<HeaderName, GatewayError> {
    match ctx.metadata.get(REQUEST_ID_HEADER_KEY) {
        Some(value) => HeaderName::from_bytes(value.as_bytes()).map_err(|error| {
            GatewayError::Protocol {
                provider,
                model: model.map(str::to_string),
                request_id: None,
                message: format!("invalid header name: {value}: {error}"),
            }
        }),
        None => Ok(HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER)),
    }
}

async fn status_error(
    provider: ProviderId,
    model: Option<&str>,
    status_code: u16,
    request_id: Option<String>,
    response: Response,
) -> GatewayError {
    let message = match response.text().await {
        Ok(body) if !body.trim().is_empty() => body,
        Ok(_) => format!("http status {status_code}"),
        Err(error) => format!("http status {status_code}; failed to read response body: {error}"),
    };

    GatewayError::Status {
        provider,
        model: model.map(str::to_string),
        status_code,
        request_id,
        message,
    }
}

fn is_retryable_transport(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}
