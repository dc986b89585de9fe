use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::PipelineConfig;
use crate::core::error::{ConfigError, GatewayError};
use crate::core::traits::{GenerationAdapter, ModelGateway, TranslationAdapter};
use crate::core::types::{AdapterContext, LanguageRoute, ProviderId};
use crate::providers::{ChatCompletionsAdapter, HuggingFaceAdapter, OllamaAdapter};
use crate::registry::GeneratorRegistry;
use crate::transport::http::HttpTransport;

/// [`ModelGateway`] backed by one translation adapter and a set of
/// generation adapters routed by model id.
pub struct Gateway {
    translator: Arc<dyn TranslationAdapter>,
    registry: GeneratorRegistry,
    adapter_context: AdapterContext,
}

pub struct GatewayBuilder {
    translator: Arc<dyn TranslationAdapter>,
    generators: Vec<Arc<dyn GenerationAdapter>>,
    default_generator: Option<ProviderId>,
    adapter_context: AdapterContext,
}

impl Gateway {
    pub fn builder(translator: Arc<dyn TranslationAdapter>) -> GatewayBuilder {
        GatewayBuilder {
            translator,
            generators: Vec::new(),
            default_generator: None,
            adapter_context: AdapterContext::default(),
        }
    }

    /// HuggingFace translates and is the default generator. Ollama is always
    /// routable; ChatGPT and DeepSeek only when their key is configured.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(config.timeout_ms, config.retry_policy())?;

        let huggingface = Arc::new(HuggingFaceAdapter::with_transport(
            config.huggingface_api_key.clone(),
            config.huggingface_api_url.clone(),
            config.translation_model.clone(),
            transport.clone(),
        )?);

        let mut builder = Self::builder(huggingface.clone())
            .with_generator(huggingface)
            .with_default_generator(ProviderId::HuggingFace)
            .with_generator(Arc::new(OllamaAdapter::with_transport(
                config.ollama_api_url.clone(),
                transport.clone(),
            )));

        if config.chatgpt_api_key.is_some() {
            builder = builder.with_generator(Arc::new(
                ChatCompletionsAdapter::chatgpt_with_transport(
                    config.chatgpt_api_key.clone(),
                    config.chatgpt_api_url.clone(),
                    transport.clone(),
                ),
            ));
        }
        if config.deepseek_api_key.is_some() {
            builder = builder.with_generator(Arc::new(
                ChatCompletionsAdapter::deepseek_with_transport(
                    config.deepseek_api_key.clone(),
                    config.deepseek_api_url.clone(),
                    transport,
                ),
            ));
        }

        let gateway = builder.build();
        info!(
            generators = ?gateway.generation_providers(),
            "model gateway ready"
        );
        Ok(gateway)
    }

    pub fn translation_provider(&self) -> ProviderId {
        self.translator.id()
    }

    pub fn generation_providers(&self) -> Vec<ProviderId> {
        self.registry.providers().collect()
    }
}

#[async_trait]
impl ModelGateway for Gateway {
    async fn translate(&self, text: &str, route: &LanguageRoute) -> Result<String, GatewayError> {
        debug!(provider = ?self.translator.id(), %route, "gateway translate");
        self.translator
            .translate(text, route, &self.adapter_context)
            .await
    }

    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, GatewayError> {
        let resolved = self.registry.resolve(model_id)?;
        debug!(
            provider = ?resolved.provider,
            model = resolved.model_id,
            "gateway generate"
        );
        resolved
            .adapter
            .generate(prompt, resolved.model_id, &self.adapter_context)
            .await
    }
}

impl GatewayBuilder {
    pub fn with_generator(mut self, adapter: Arc<dyn GenerationAdapter>) -> Self {
        self.generators.push(adapter);
        self
    }

    pub fn with_default_generator(mut self, provider: ProviderId) -> Self {
        self.default_generator = Some(provider);
        self
    }

    pub fn with_adapter_context(mut self, adapter_context: AdapterContext) -> Self {
        self.adapter_context = adapter_context;
        self
    }

    pub fn build(self) -> Gateway {
        let mut registry = GeneratorRegistry::new(self.default_generator);
        for adapter in self.generators {
            registry.register(adapter);
        }

        Gateway {
            translator: self.translator,
            registry,
            adapter_context: self.adapter_context,
        }
    }
}

#[cfg(test)]
mod tests;
