use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single English phrase to run through the Japanese pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TranslationRequest {
    pub input_text: String,
}

impl TranslationRequest {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
        }
    }
}

/// A phrase plus the target language for the generic translation variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OtherTranslationRequest {
    pub input_text: String,
    pub target_lang: String,
}

impl OtherTranslationRequest {
    pub fn new(input_text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Transliteration bundle produced by the Japanese pipeline.
///
/// Fields are filled stage by stage. On failure the record keeps whatever the
/// completed stages produced and `error` carries the failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub name_english: String,
    pub name_hiragana: Option<String>,
    pub name_katakana: Option<String>,
    pub name_romaji: Option<String>,
    pub original_ai_translation: Option<String>,
    pub explanation: Option<String>,
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    pub fn for_request(request: &TranslationRequest) -> Self {
        Self {
            name_english: request.input_text.clone(),
            name_hiragana: None,
            name_katakana: None,
            name_romaji: None,
            original_ai_translation: None,
            explanation: None,
            emoji: None,
            error: None,
        }
    }

    /// First unfilled field, in stage order.
    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("originalAiTranslation", &self.original_ai_translation),
            ("nameHiragana", &self.name_hiragana),
            ("nameKatakana", &self.name_katakana),
            ("nameRomaji", &self.name_romaji),
            ("explanation", &self.explanation),
            ("emoji", &self.emoji),
        ]
        .into_iter()
        .find_map(|(name, value)| value.is_none().then_some(name))
    }
}

/// Result of the generic-language variant; no script normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedResult {
    pub name_english: String,
    pub original_ai_translation: Option<String>,
    pub explanation: Option<String>,
    pub emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslatedResult {
    pub fn for_request(request: &OtherTranslationRequest) -> Self {
        Self {
            name_english: request.input_text.clone(),
            original_ai_translation: None,
            explanation: None,
            emoji: None,
            error: None,
        }
    }

    pub fn first_missing_field(&self) -> Option<&'static str> {
        [
            ("originalAiTranslation", &self.original_ai_translation),
            ("explanation", &self.explanation),
            ("emoji", &self.emoji),
        ]
        .into_iter()
        .find_map(|(name, value)| value.is_none().then_some(name))
    }
}

/// Records that can carry a failure message next to their partial fields.
pub trait PartialRecord {
    fn attach_error(&mut self, message: String);
}

impl PartialRecord for TranslationResult {
    fn attach_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

impl PartialRecord for TranslatedResult {
    fn attach_error(&mut self, message: String) {
        self.error = Some(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    Hiragana,
    Katakana,
    KanjiMixed,
    Romaji,
    Unknown,
}

impl ScriptKind {
    /// Kinds the normalizer can turn into hiragana without another reduction.
    pub fn is_kana(self) -> bool {
        matches!(self, Self::Hiragana | Self::Katakana)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Translating,
    NormalizingScript,
    Explaining,
    Annotating,
    Validating,
    Done,
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Translating => "translating",
            Self::NormalizingScript => "normalizing_script",
            Self::Explaining => "explaining",
            Self::Annotating => "annotating",
            Self::Validating => "validating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// One unit of morphological segmentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Token {
    pub surface: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading: Option<String>,
}

impl Token {
    pub fn read(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: Some(reading.into()),
        }
    }

    pub fn unread(surface: impl Into<String>) -> Self {
        Self {
            surface: surface.into(),
            reading: None,
        }
    }
}

/// Source and target language codes handed to the translation model.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LanguageRoute {
    pub source_lang: String,
    pub target_lang: String,
}

impl LanguageRoute {
    pub fn new(source_lang: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            source_lang: normalize_lang(source_lang.into()),
            target_lang: normalize_lang(target_lang.into()),
        }
    }

    pub fn english_to_japanese() -> Self {
        Self::new("en", "ja")
    }

    pub fn from_english(target_lang: impl Into<String>) -> Self {
        Self::new("en", target_lang)
    }

    pub fn is_english_to_japanese(&self) -> bool {
        self.source_lang == "en" && self.target_lang == "ja"
    }
}

impl fmt::Display for LanguageRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source_lang, self.target_lang)
    }
}

fn normalize_lang(value: String) -> String {
    value.trim().to_ascii_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    HuggingFace,
    ChatGpt,
    DeepSeek,
    Ollama,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::ChatGpt => "chatgpt",
            Self::DeepSeek => "deepseek",
            Self::Ollama => "ollama",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Some(Self::HuggingFace),
            "chatgpt" | "openai" => Some(Self::ChatGpt),
            "deepseek" => Some(Self::DeepSeek),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }
}

/// Per-call metadata handed to adapters and the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AdapterContext {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests;
