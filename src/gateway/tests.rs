use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::PipelineConfig;
use crate::core::error::{GatewayError, RoutingError};
use crate::core::traits::{GenerationAdapter, ModelGateway, TranslationAdapter};
use crate::core::types::{AdapterContext, LanguageRoute, ProviderId};
use crate::gateway::Gateway;

#[derive(Default)]
struct RecordingTranslator {
    seen: Mutex<Vec<(String, String, Option<String>)>>,
}

#[async_trait]
impl TranslationAdapter for RecordingTranslator {
    fn id(&self) -> ProviderId {
        ProviderId::HuggingFace
    }

    async fn translate(
        &self,
        text: &str,
        route: &LanguageRoute,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        self.seen.lock().expect("seen lock").push((
            text.to_string(),
            route.to_string(),
            ctx.metadata.get("tenant").cloned(),
        ));
        Ok("母".to_string())
    }
}

struct LabelGenerator {
    provider: ProviderId,
}

#[async_trait]
impl GenerationAdapter for LabelGenerator {
    fn id(&self) -> ProviderId {
        self.provider
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        _ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        Ok(format!("{}|{model_id}|{prompt}", self.provider.as_str()))
    }
}

fn gateway(translator: Arc<RecordingTranslator>) -> Gateway {
    let mut metadata = BTreeMap::new();
    metadata.insert("tenant".to_string(), "grocery".to_string());

    Gateway::builder(translator)
        .with_generator(Arc::new(LabelGenerator {
            provider: ProviderId::HuggingFace,
        }))
        .with_generator(Arc::new(LabelGenerator {
            provider: ProviderId::Ollama,
        }))
        .with_default_generator(ProviderId::HuggingFace)
        .with_adapter_context(AdapterContext { metadata })
        .build()
}

#[tokio::test]
async fn test_translate_delegates_with_adapter_context() {
    let translator = Arc::new(RecordingTranslator::default());
    let gateway = gateway(Arc::clone(&translator));

    let text = gateway
        .translate("mother", &LanguageRoute::english_to_japanese())
        .await
        .expect("fake translator");
    assert_eq!(text, "母");
    assert_eq!(gateway.translation_provider(), ProviderId::HuggingFace);

    let seen = translator.seen.lock().expect("seen lock").clone();
    assert_eq!(
        seen,
        vec![(
            "mother".to_string(),
            "en->ja".to_string(),
            Some("grocery".to_string())
        )]
    );
}

#[tokio::test]
async fn test_generate_routes_by_prefix_and_default() {
    let gateway = gateway(Arc::new(RecordingTranslator::default()));

    assert_eq!(
        gateway.generate("p", "ollama:phi").await,
        Ok("ollama|phi|p".to_string())
    );
    assert_eq!(
        gateway
            .generate("p", "mistralai/Mistral-Nemo-Instruct-2407")
            .await,
        Ok("huggingface|mistralai/Mistral-Nemo-Instruct-2407|p".to_string())
    );
}

#[tokio::test]
async fn test_generate_unregistered_provider_is_routing_error() {
    let gateway = gateway(Arc::new(RecordingTranslator::default()));

    let err = gateway
        .generate("p", "chatgpt:gpt-3.5-turbo")
        .await
        .expect_err("chatgpt not registered");
    assert_eq!(
        err,
        GatewayError::Routing(RoutingError::ProviderNotRegistered {
            provider: ProviderId::ChatGpt
        })
    );
}

#[test]
fn test_from_config_registers_keyed_chat_providers_only() {
    let config = PipelineConfig {
        deepseek_api_key: Some("sk-deep".to_string()),
        ..PipelineConfig::default()
    };
    let gateway = Gateway::from_config(&config).expect("valid config");

    assert_eq!(gateway.translation_provider(), ProviderId::HuggingFace);
    assert_eq!(
        gateway.generation_providers(),
        vec![
            ProviderId::HuggingFace,
            ProviderId::Ollama,
            ProviderId::DeepSeek
        ]
    );
}
