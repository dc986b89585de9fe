use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{ConfigError, GatewayError};
use crate::core::traits::GenerationAdapter;
use crate::core::types::{AdapterContext, ProviderId};
use crate::providers::cache_bust::with_cache_bust;
use crate::providers::chat_completions_codec::ChatCompletionsCodec;
use crate::providers::codec::PayloadCodec;
use crate::providers::{map_auth_status, normalize_base_url, sanitize_api_key};
use crate::transport::http::{AUTH_BEARER_TOKEN_KEY, HttpTransport, RetryPolicy};

pub const CHATGPT_DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const CHATGPT_DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEEPSEEK_DEFAULT_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Generation through an OpenAI-compatible chat completions endpoint.
///
/// The endpoint is the full URL of the completions route; the API key is
/// mandatory.
pub struct ChatCompletionsAdapter {
    transport: HttpTransport,
    codec: ChatCompletionsCodec,
    endpoint: String,
    api_key: Option<String>,
    default_model: String,
    key_env: &'static str,
}

impl ChatCompletionsAdapter {
    pub fn chatgpt(
        api_key: Option<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT_MS, RetryPolicy::default())?;
        Ok(Self::chatgpt_with_transport(api_key, endpoint, transport))
    }

    pub fn chatgpt_with_transport(
        api_key: Option<String>,
        endpoint: impl Into<String>,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            codec: ChatCompletionsCodec {
                provider: ProviderId::ChatGpt,
                max_tokens: None,
                temperature: None,
            },
            endpoint: normalize_base_url(endpoint, CHATGPT_DEFAULT_ENDPOINT),
            api_key: sanitize_api_key(api_key),
            default_model: CHATGPT_DEFAULT_MODEL.to_string(),
            key_env: "CHATGPT_API_KEY",
        }
    }

    pub fn deepseek(
        api_key: Option<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT_MS, RetryPolicy::default())?;
        Ok(Self::deepseek_with_transport(api_key, endpoint, transport))
    }

    pub fn deepseek_with_transport(
        api_key: Option<String>,
        endpoint: impl Into<String>,
        transport: HttpTransport,
    ) -> Self {
        Self {
            transport,
            codec: ChatCompletionsCodec {
                provider: ProviderId::DeepSeek,
                max_tokens: Some(150),
                temperature: Some(0.7),
            },
            endpoint: normalize_base_url(endpoint, DEEPSEEK_DEFAULT_ENDPOINT),
            api_key: sanitize_api_key(api_key),
            default_model: DEEPSEEK_DEFAULT_MODEL.to_string(),
            key_env: "DEEPSEEK_API_KEY",
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    fn missing_api_key_error(&self) -> GatewayError {
        GatewayError::CredentialsRejected {
            provider: self.codec.provider,
            request_id: None,
            message: format!("missing API key; set {}", self.key_env),
        }
    }
}

#[async_trait]
impl GenerationAdapter for ChatCompletionsAdapter {
    fn id(&self) -> ProviderId {
        self.codec.provider
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .clone()
            .ok_or_else(|| self.missing_api_key_error())?;

        let model_id = if model_id.trim().is_empty() {
            self.default_model.as_str()
        } else {
            model_id
        };
        debug!(provider = ?self.codec.provider, model = model_id, "generating text");

        let body = self
            .codec
            .encode_request(&with_cache_bust(prompt), model_id);

        let mut request_ctx = ctx.clone();
        request_ctx
            .metadata
            .insert(AUTH_BEARER_TOKEN_KEY.to_string(), api_key);

        let response: Value = self
            .transport
            .post_json(
                self.codec.provider,
                Some(model_id),
                &self.endpoint,
                &body,
                &request_ctx,
            )
            .await
            .map_err(|error| map_auth_status(payment_required(error)))?;

        self.codec.decode_response(&response, model_id)
    }
}

fn payment_required(error: GatewayError) -> GatewayError {
    match error {
        GatewayError::Status {
            provider,
            model,
            status_code: 402,
            request_id,
            message,
        } => GatewayError::Status {
            provider,
            model,
            status_code: 402,
            request_id,
            message: format!("payment required: {message}"),
        },
        other => other,
    }
}
