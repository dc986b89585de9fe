use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::error::{ConfigError, GatewayError};
use crate::core::traits::GenerationAdapter;
use crate::core::types::{AdapterContext, ProviderId};
use crate::providers::cache_bust::with_cache_bust;
use crate::providers::codec::PayloadCodec;
use crate::providers::normalize_base_url;
use crate::providers::ollama_codec::OllamaCodec;
use crate::transport::http::{HttpTransport, RetryPolicy};

pub const OLLAMA_DEFAULT_BASE_URL: &str = "https://api.ollama.ai";
pub const OLLAMA_DEFAULT_MODEL: &str = "phi";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Generation against an Ollama server's `/generate` route. No auth.
pub struct OllamaAdapter {
    transport: HttpTransport,
    base_url: String,
}

impl OllamaAdapter {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(DEFAULT_TIMEOUT_MS, RetryPolicy::default())?;
        Ok(Self::with_transport(base_url, transport))
    }

    pub fn with_transport(base_url: impl Into<String>, transport: HttpTransport) -> Self {
        Self {
            transport,
            base_url: normalize_base_url(base_url, OLLAMA_DEFAULT_BASE_URL),
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url)
    }
}

#[async_trait]
impl GenerationAdapter for OllamaAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        let model_id = if model_id.trim().is_empty() {
            OLLAMA_DEFAULT_MODEL
        } else {
            model_id
        };
        debug!(model = model_id, "generating text");

        let body = OllamaCodec.encode_request(&with_cache_bust(prompt), model_id);
        let response: Value = self
            .transport
            .post_json(
                ProviderId::Ollama,
                Some(model_id),
                &self.generate_url(),
                &body,
                ctx,
            )
            .await?;

        OllamaCodec.decode_response(&response, model_id)
    }
}
