use std::path::PathBuf;

use tracing::debug;

use crate::core::error::ConfigError;
use crate::providers::chat_completions::{CHATGPT_DEFAULT_ENDPOINT, DEEPSEEK_DEFAULT_ENDPOINT};
use crate::providers::huggingface::{
    HUGGINGFACE_DEFAULT_BASE_URL, HUGGINGFACE_DEFAULT_TRANSLATION_MODEL,
};
use crate::providers::ollama::OLLAMA_DEFAULT_BASE_URL;
use crate::segment::DictionarySegmenter;
use crate::transport::http::RetryPolicy;

pub const DEFAULT_TEXTGEN_MODEL: &str = "mistralai/Mistral-Nemo-Instruct-2407";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
/// `HUGGINGFACE_READING_MODEL` value that keeps readings offline.
pub const OFFLINE_READINGS: &str = "none";

/// Deployment settings, read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub huggingface_api_url: String,
    pub huggingface_api_key: Option<String>,
    pub translation_model: String,
    /// Model used for explanation and emoji generation. May carry a
    /// `provider:` prefix.
    pub textgen_model: String,
    /// Model asked for hiragana readings; `None` leaves readings to the
    /// dictionary alone.
    pub reading_model: Option<String>,
    pub chatgpt_api_url: String,
    pub chatgpt_api_key: Option<String>,
    pub deepseek_api_url: String,
    pub deepseek_api_key: Option<String>,
    pub ollama_api_url: String,
    pub timeout_ms: u64,
    pub http_max_attempts: u32,
    pub dictionary_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            huggingface_api_url: HUGGINGFACE_DEFAULT_BASE_URL.to_string(),
            huggingface_api_key: None,
            translation_model: HUGGINGFACE_DEFAULT_TRANSLATION_MODEL.to_string(),
            textgen_model: DEFAULT_TEXTGEN_MODEL.to_string(),
            reading_model: Some(DEFAULT_TEXTGEN_MODEL.to_string()),
            chatgpt_api_url: CHATGPT_DEFAULT_ENDPOINT.to_string(),
            chatgpt_api_key: None,
            deepseek_api_url: DEEPSEEK_DEFAULT_ENDPOINT.to_string(),
            deepseek_api_key: None,
            ollama_api_url: OLLAMA_DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            http_max_attempts: 1,
            dictionary_path: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();
        let textgen_model = read("HUGGINGFACE_TEXTGEN_MODEL").unwrap_or(defaults.textgen_model);
        let reading_model = match read("HUGGINGFACE_READING_MODEL") {
            Some(model) if model.eq_ignore_ascii_case(OFFLINE_READINGS) => None,
            Some(model) => Some(model),
            None => Some(textgen_model.clone()),
        };

        let config = Self {
            huggingface_api_url: read("HUGGINGFACE_API_URL")
                .unwrap_or(defaults.huggingface_api_url),
            huggingface_api_key: read("HUGGINGFACE_API_KEY"),
            translation_model: read("HUGGINGFACE_TRANSLATION_MODEL")
                .unwrap_or(defaults.translation_model),
            textgen_model,
            reading_model,
            chatgpt_api_url: read("CHATGPT_API_URL").unwrap_or(defaults.chatgpt_api_url),
            chatgpt_api_key: read("CHATGPT_API_KEY"),
            deepseek_api_url: read("DEEPSEEK_API_URL").unwrap_or(defaults.deepseek_api_url),
            deepseek_api_key: read("DEEPSEEK_API_KEY"),
            ollama_api_url: read("OLLAMA_API_URL").unwrap_or(defaults.ollama_api_url),
            timeout_ms: parse_setting("GATEWAY_TIMEOUT_MS", read("GATEWAY_TIMEOUT_MS"))?
                .unwrap_or(defaults.timeout_ms),
            http_max_attempts: parse_setting(
                "GATEWAY_HTTP_MAX_ATTEMPTS",
                read("GATEWAY_HTTP_MAX_ATTEMPTS"),
            )?
            .unwrap_or(defaults.http_max_attempts),
            dictionary_path: read("READING_DICTIONARY_PATH").map(PathBuf::from),
        };

        config.validate()?;
        debug!(
            translation_model = %config.translation_model,
            textgen_model = %config.textgen_model,
            timeout_ms = config.timeout_ms,
            "loaded pipeline config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout {
                timeout_ms: self.timeout_ms,
            });
        }
        self.retry_policy().validate()?;

        for (key, value) in [
            ("HUGGINGFACE_TRANSLATION_MODEL", &self.translation_model),
            ("HUGGINGFACE_TEXTGEN_MODEL", &self.textgen_model),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(key, "must not be empty"));
            }
        }
        if self
            .reading_model
            .as_deref()
            .is_some_and(|model| model.trim().is_empty())
        {
            return Err(invalid("HUGGINGFACE_READING_MODEL", "must not be empty"));
        }

        for (key, value) in [
            ("HUGGINGFACE_API_URL", &self.huggingface_api_url),
            ("CHATGPT_API_URL", &self.chatgpt_api_url),
            ("DEEPSEEK_API_URL", &self.deepseek_api_url),
            ("OLLAMA_API_URL", &self.ollama_api_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid(key, &format!("not an http(s) url: {value}")));
            }
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::with_max_attempts(self.http_max_attempts)
    }

    /// Bundled readings, overridden by the entries of `dictionary_path`.
    pub fn load_segmenter(&self) -> Result<DictionarySegmenter, ConfigError> {
        let mut segmenter = DictionarySegmenter::bundled()?;
        if let Some(path) = &self.dictionary_path {
            segmenter.merge(DictionarySegmenter::from_path(path)?);
        }
        Ok(segmenter)
    }
}

fn parse_setting<T>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|error| invalid(key, &format!("{raw:?}: {error}")))
        })
        .transpose()
}

fn invalid(key: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidSetting {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
