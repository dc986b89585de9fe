use async_trait::async_trait;

use crate::core::error::GatewayError;
use crate::core::types::{AdapterContext, LanguageRoute, ProviderId, Token};

/// Uniform contract over the two external model capabilities the pipeline
/// consumes.
///
/// Implementations are stateless between calls so a single gateway can serve
/// concurrent pipeline runs.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Translates `text` along `route` and returns the plain translated text.
    async fn translate(&self, text: &str, route: &LanguageRoute) -> Result<String, GatewayError>;

    /// Runs free-form text generation with the given model.
    async fn generate(&self, prompt: &str, model_id: &str) -> Result<String, GatewayError>;
}

/// Provider-side translation capability plugged into a [`crate::gateway::Gateway`].
#[async_trait]
pub trait TranslationAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn translate(
        &self,
        text: &str,
        route: &LanguageRoute,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError>;
}

/// Provider-side generation capability plugged into a [`crate::gateway::Gateway`].
///
/// Implementations prepend a cache-busting token to the prompt before sending.
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    fn id(&self) -> ProviderId;

    async fn generate(
        &self,
        prompt: &str,
        model_id: &str,
        ctx: &AdapterContext,
    ) -> Result<String, GatewayError>;
}

/// Morphological segmentation: split text into tokens, each with its phonetic
/// reading when the segmenter knows one.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<Token>;
}

#[cfg(test)]
mod tests;
