use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;
use crate::core::error::GatewayError;
use crate::core::types::{AdapterContext, LanguageRoute, ProviderId, Token};

#[derive(Clone, Default)]
struct RecordingGateway {
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl ModelGateway for RecordingGateway {
    async fn translate(&self, text: &str, route: &LanguageRoute) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(format!("translate {route} {text}"));
        Ok("母".to_string())
    }

    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, GatewayError> {
        self.calls
            .lock()
            .expect("calls lock should not be poisoned")
            .push(format!("generate {model_id} {prompt}"));
        Err(GatewayError::Protocol {
            provider: ProviderId::Ollama,
            model: Some(model_id.to_string()),
            request_id: None,
            message: "no generation configured".to_string(),
        })
    }
}

struct EchoAdapter;

#[async_trait]
impl GenerationAdapter for EchoAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError> {
        let suffix = ctx.metadata.get("suffix").cloned().unwrap_or_default();
        Ok(format!("{model_id}:{prompt}{suffix}"))
    }
}

struct CharSegmenter;

impl Segmenter for CharSegmenter {
    fn segment(&self, text: &str) -> Vec<Token> {
        text.chars().map(|ch| Token::unread(ch.to_string())).collect()
    }
}

#[tokio::test]
async fn test_model_gateway_is_object_safe() {
    let recording = RecordingGateway::default();
    let gateway: Arc<dyn ModelGateway> = Arc::new(recording.clone());

    let translated = gateway
        .translate("mother", &LanguageRoute::english_to_japanese())
        .await
        .expect("translate should succeed");
    assert_eq!(translated, "母");

    let err = gateway
        .generate("explain", "test-model")
        .await
        .expect_err("generate should fail");
    assert!(matches!(err, GatewayError::Protocol { .. }));

    let calls = recording
        .calls
        .lock()
        .expect("calls lock should not be poisoned")
        .clone();
    assert_eq!(
        calls,
        vec![
            "translate en->ja mother".to_string(),
            "generate test-model explain".to_string()
        ]
    );
}

#[tokio::test]
async fn test_generation_adapter_receives_context() {
    let adapter: Arc<dyn GenerationAdapter> = Arc::new(EchoAdapter);
    let mut ctx = AdapterContext::default();
    ctx.metadata.insert("suffix".to_string(), "!".to_string());

    let output = adapter
        .generate("hi", "m", &ctx)
        .await
        .expect("generate should succeed");
    assert_eq!(output, "m:hi!");
    assert_eq!(adapter.id(), ProviderId::Ollama);
}

#[test]
fn test_segmenter_trait_object() {
    let segmenter: Box<dyn Segmenter> = Box::new(CharSegmenter);
    let tokens = segmenter.segment("はは");
    assert_eq!(tokens, vec![Token::unread("は"), Token::unread("は")]);
}
