pub(crate) mod cache_bust;
pub mod chat_completions;
pub(crate) mod chat_completions_codec;
pub(crate) mod codec;
pub mod huggingface;
pub(crate) mod huggingface_codec;
pub mod ollama;
pub(crate) mod ollama_codec;

pub use cache_bust::invisible_token;
pub use chat_completions::ChatCompletionsAdapter;
pub use huggingface::HuggingFaceAdapter;
pub use ollama::OllamaAdapter;

use crate::core::error::GatewayError;

pub(crate) fn normalize_base_url(base_url: impl Into<String>, default: &str) -> String {
    let value = base_url.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }

    trimmed.trim_end_matches('/').to_string()
}

pub(crate) fn sanitize_api_key(api_key: Option<String>) -> Option<String> {
    api_key.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 401 and 403 mean the provider refused our key.
pub(crate) fn map_auth_status(error: GatewayError) -> GatewayError {
    match error {
        GatewayError::Status {
            provider,
            status_code: 401 | 403,
            request_id,
            message,
            ..
        } => GatewayError::CredentialsRejected {
            provider,
            request_id,
            message,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests;
