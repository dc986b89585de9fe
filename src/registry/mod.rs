use std::sync::Arc;

use crate::core::error::RoutingError;
use crate::core::traits::GenerationAdapter;
use crate::core::types::ProviderId;

/// Generation adapters keyed by provider, plus the provider that serves
/// model ids without a `provider:` prefix.
#[derive(Default)]
pub struct GeneratorRegistry {
    adapters: Vec<(ProviderId, Arc<dyn GenerationAdapter>)>,
    default_provider: Option<ProviderId>,
}

/// A model id resolved to the adapter that serves it.
pub struct ResolvedModel<'a> {
    pub provider: ProviderId,
    pub adapter: Arc<dyn GenerationAdapter>,
    pub model_id: &'a str,
}

impl GeneratorRegistry {
    pub fn new(default_provider: Option<ProviderId>) -> Self {
        Self {
            adapters: Vec::new(),
            default_provider,
        }
    }

    /// Registers `adapter`, replacing any adapter already registered for the
    /// same provider.
    pub fn register(&mut self, adapter: Arc<dyn GenerationAdapter>) {
        let provider = adapter.id();

        if let Some((_, existing_adapter)) = self
            .adapters
            .iter_mut()
            .find(|(registered_provider, _)| *registered_provider == provider)
        {
            *existing_adapter = adapter;
            return;
        }

        self.adapters.push((provider, adapter));
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.adapters.iter().map(|(provider, _)| *provider)
    }

    pub fn default_provider(&self) -> Option<ProviderId> {
        self.default_provider
    }

    pub fn resolve_adapter(
        &self,
        provider: ProviderId,
    ) -> Result<Arc<dyn GenerationAdapter>, RoutingError> {
        self.adapters
            .iter()
            .find(|(registered_provider, _)| *registered_provider == provider)
            .map(|(_, adapter)| Arc::clone(adapter))
            .ok_or(RoutingError::ProviderNotRegistered { provider })
    }

    /// `ollama:phi` routes to the Ollama adapter with model `phi`. Ids whose
    /// prefix is not a provider name (`llama3:8b`) go to the default provider
    /// unchanged.
    pub fn resolve<'a>(&self, model_id: &'a str) -> Result<ResolvedModel<'a>, RoutingError> {
        if let Some((prefix, rest)) = model_id.split_once(':') {
            if let Some(provider) = ProviderId::parse(prefix) {
                let adapter = self.resolve_adapter(provider)?;
                return Ok(ResolvedModel {
                    provider,
                    adapter,
                    model_id: rest,
                });
            }
        }

        let provider = self
            .default_provider
            .ok_or_else(|| RoutingError::NoDefaultGenerator {
                model: model_id.to_string(),
            })?;
        let adapter = self.resolve_adapter(provider)?;
        Ok(ResolvedModel {
            provider,
            adapter,
            model_id,
        })
    }
}
