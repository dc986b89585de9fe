use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{ConfigError, GatewayError};
use crate::core::traits::{GenerationAdapter, TranslationAdapter};
use crate::core::types::{AdapterContext, LanguageRoute, ProviderId};
use crate::providers::cache_bust::with_cache_bust;
use crate::providers::codec::PayloadCodec;
use crate::providers::huggingface_codec::{HfTask, HuggingFaceCodec};
use crate::providers::{map_auth_status, normalize_base_url, sanitize_api_key};
use crate::transport::http::{AUTH_BEARER_TOKEN_KEY, HttpTransport, RetryPolicy};

pub const HUGGINGFACE_DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const HUGGINGFACE_DEFAULT_TRANSLATION_MODEL: &str = "Helsinki-NLP/opus-mt-en-jap";
const HUGGINGFACE_API_KEY_METADATA: &str = "huggingface.api_key";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Hosted inference API: translation models and text-generation models
/// behind the same `POST {base}/models/{model}` endpoint.
pub struct HuggingFaceAdapter {
    transport: HttpTransport,
    base_url: String,
    api_key: Option<String>,
    translation_model: String,
}

impl HuggingFaceAdapter {
    pub fn new(api_key: Option<String>) -> Result<Self, ConfigError> {
        Self::with_base_url(
            api_key,
            HUGGINGFACE_DEFAULT_BASE_URL,
            HUGGINGFACE_DEFAULT_TRANSLATION_MODEL,
        )
    }

    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
        translation_model: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT_MS, RetryPolicy::default())?;
        Self::with_transport(api_key, base_url, translation_model, transport)
    }

    pub fn with_transport(
        api_key: Option<String>,
        base_url: impl Into<String>,
        translation_model: impl Into<String>,
        transport: HttpTransport,
    ) -> Result<Self, ConfigError> {
        let translation_model = translation_model.into().trim().to_string();
        if translation_model.is_empty() {
            return Err(ConfigError::InvalidProviderConfig {
                provider: ProviderId::HuggingFace,
                reason: "translation model must not be empty".to_string(),
            });
        }

        Ok(Self {
            transport,
            base_url: normalize_base_url(base_url, HUGGINGFACE_DEFAULT_BASE_URL),
            api_key: sanitize_api_key(api_key),
            translation_model,
        })
    }

    /// The configured model serves `en -> ja`; other routes use the matching
    /// opus-mt model.
    pub fn translation_model_for(&self, route: &LanguageRoute) -> String {
        if route.is_english_to_japanese() {
            self.translation_model.clone()
        } else {
            format!(
                "Helsinki-NLP/opus-mt-{}-{}",
                route.source_lang, route.target_lang
            )
        }
    }

    fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.base_url, model_id)
    }

    fn request_context(&self, ctx: &AdapterContext) -> AdapterContext {
        let api_key = self.api_key.clone().or_else(|| {
            ctx.metadata
                .get(HUGGINGFACE_API_KEY_METADATA)
                .and_then(|key| sanitize_api_key(Some(key.clone())))
        });

        let mut request_ctx = ctx.clone();
        if let Some(api_key) = api_key {
            request_ctx
                .metadata
                .insert(AUTH_BEARER_TOKEN_KEY.to_string(), api_key);
        }
        request_ctx
    }

    async fn infer(
        &self,
        task: HfTask,
        input: &str,
        model_id: &str,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        let codec = HuggingFaceCodec { task };
        let body = codec.encode_request(input, model_id);

        let response: Value = self
            .transport
            .post_json(
                ProviderId::HuggingFace,
                Some(model_id),
                &self.model_url(model_id),
                &body,
                &self.request_context(ctx),
            )
            .await
            .map_err(map_auth_status)?;

        codec.decode_response(&response, model_id)
    }
}

#[async_trait]
impl TranslationAdapter for HuggingFaceAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn translate(
        &self,
        text: &str,
        route: &LanguageRoute,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        let model_id = self.translation_model_for(route);
        debug!(model = %model_id, %route, text, "translating");
        self.infer(HfTask::Translation, text, &model_id, ctx).await
    }
}

#[async_trait]
impl GenerationAdapter for HuggingFaceAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        debug!(model = model_id, "generating text");
        self.infer(
            HfTask::TextGeneration,
            &with_cache_bust(prompt),
            model_id,
            ctx,
        )
        .await
    }
}

#[cfg(test)]
mod tests;
