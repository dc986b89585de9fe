pub mod other;
pub mod prompts;
mod stages;

use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};

pub use other::OtherLanguagePipeline;
pub use stages::is_valid_reply;

use crate::config::{DEFAULT_TEXTGEN_MODEL, PipelineConfig};
use crate::core::error::{ConfigError, PipelineError, PipelineFailure};
use crate::core::traits::{ModelGateway, Segmenter};
use crate::core::types::{LanguageRoute, PipelineStage, TranslationRequest, TranslationResult};
use crate::gateway::Gateway;
use crate::retry::RetryBudget;
use crate::script::{hiragana_to_katakana, to_romaji};

type StageResult = Result<TranslationResult, PipelineFailure<TranslationResult>>;

/// Attempt ceilings of the three bounded steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageBudgets {
    pub normalize: RetryBudget,
    pub explain: RetryBudget,
    pub emoji: RetryBudget,
}

impl Default for StageBudgets {
    fn default() -> Self {
        Self {
            normalize: RetryBudget::with_retries(3),
            explain: RetryBudget::attempts(2),
            emoji: RetryBudget::attempts(2),
        }
    }
}

/// English phrase to Japanese: translation, hiragana/katakana/romaji, an
/// explanation and an emoji.
///
/// Stateless between runs; share it behind an `Arc` to serve concurrent
/// requests.
pub struct TranslationPipeline {
    gateway: Arc<dyn ModelGateway>,
    segmenter: Arc<dyn Segmenter>,
    text_model: String,
    reading_model: Option<String>,
    budgets: StageBudgets,
}

pub struct TranslationPipelineBuilder {
    gateway: Arc<dyn ModelGateway>,
    segmenter: Arc<dyn Segmenter>,
    text_model: String,
    reading_model: Option<String>,
    budgets: StageBudgets,
}

impl TranslationPipeline {
    pub fn builder(
        gateway: Arc<dyn ModelGateway>,
        segmenter: Arc<dyn Segmenter>,
    ) -> TranslationPipelineBuilder {
        TranslationPipelineBuilder {
            gateway,
            segmenter,
            text_model: DEFAULT_TEXTGEN_MODEL.to_string(),
            reading_model: None,
            budgets: StageBudgets::default(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self, ConfigError> {
        let gateway = Gateway::from_config(config)?;
        let segmenter = config.load_segmenter()?;

        let mut builder = Self::builder(Arc::new(gateway), Arc::new(segmenter))
            .with_text_model(config.textgen_model.clone());
        if let Some(reading_model) = &config.reading_model {
            builder = builder.with_reading_model(reading_model.clone());
        }
        Ok(builder.build())
    }

    pub fn text_model(&self) -> &str {
        &self.text_model
    }

    /// `None` when readings come from the segmenter alone.
    pub fn reading_model(&self) -> Option<&str> {
        self.reading_model.as_deref()
    }

    pub fn budgets(&self) -> StageBudgets {
        self.budgets
    }

    /// The free-target-language variant over the same gateway, model and
    /// budgets.
    pub fn other_language(&self) -> OtherLanguagePipeline {
        OtherLanguagePipeline::new(
            Arc::clone(&self.gateway),
            self.text_model.clone(),
            self.budgets,
        )
    }

    /// Runs every stage in order. On failure the error carries the stage it
    /// stopped in and every field filled before it.
    pub async fn execute(&self, request: &TranslationRequest) -> StageResult {
        let span = info_span!("translation_pipeline", input = %request.input_text);

        async move {
            let record = TranslationResult::for_request(request);
            let outcome = self.run_stages(record).await;

            match &outcome {
                Ok(_) => info!(stage = %PipelineStage::Done, "translation complete"),
                Err(failure) => error!(
                    stage = %PipelineStage::Failed,
                    failed_in = %failure.stage,
                    error = %failure.error,
                    "translation failed"
                ),
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_stages(&self, record: TranslationResult) -> StageResult {
        let record = self.translate(record).await?;
        let record = self.normalize(record).await?;
        let record = self.explain(record).await?;
        let record = self.annotate(record).await?;
        finalize(record)
    }

    async fn translate(&self, mut record: TranslationResult) -> StageResult {
        let route = LanguageRoute::english_to_japanese();
        match self.gateway.translate(&record.name_english, &route).await {
            Ok(translation) => {
                info!(%translation, "translated");
                record.original_ai_translation = Some(translation);
                Ok(record)
            }
            Err(error) => Err(PipelineFailure::new(
                error.into(),
                PipelineStage::Translating,
                record,
            )),
        }
    }

    async fn normalize(&self, mut record: TranslationResult) -> StageResult {
        let stage = PipelineStage::NormalizingScript;
        let Some(translation) = record.original_ai_translation.clone() else {
            return Err(PipelineFailure::new(
                missing("originalAiTranslation"),
                stage,
                record,
            ));
        };

        let reader = self
            .reading_model
            .as_deref()
            .map(|model_id| stages::ReadingModel {
                gateway: self.gateway.as_ref(),
                model_id,
            });
        match stages::normalize_script(
            self.segmenter.as_ref(),
            reader,
            &translation,
            self.budgets.normalize,
        )
        .await
        {
            Ok(hiragana) => {
                record.name_katakana = Some(hiragana_to_katakana(&hiragana));
                record.name_romaji = Some(to_romaji(&hiragana));
                record.name_hiragana = Some(hiragana);
                Ok(record)
            }
            Err(error) => Err(PipelineFailure::new(error, stage, record)),
        }
    }

    async fn explain(&self, mut record: TranslationResult) -> StageResult {
        let stage = PipelineStage::Explaining;
        let Some(translation) = record.original_ai_translation.clone() else {
            return Err(PipelineFailure::new(
                missing("originalAiTranslation"),
                stage,
                record,
            ));
        };

        match stages::explain(
            self.gateway.as_ref(),
            &translation,
            &self.text_model,
            self.budgets.explain,
        )
        .await
        {
            Ok(explanation) => {
                record.explanation = Some(explanation);
                Ok(record)
            }
            Err(error) => Err(PipelineFailure::new(error, stage, record)),
        }
    }

    async fn annotate(&self, mut record: TranslationResult) -> StageResult {
        let stage = PipelineStage::Annotating;
        let Some(translation) = record.original_ai_translation.clone() else {
            return Err(PipelineFailure::new(
                missing("originalAiTranslation"),
                stage,
                record,
            ));
        };

        match stages::annotate(
            self.gateway.as_ref(),
            &translation,
            &self.text_model,
            self.budgets.emoji,
        )
        .await
        {
            Ok(emoji) => {
                record.emoji = Some(emoji);
                Ok(record)
            }
            Err(error) => Err(PipelineFailure::new(error, stage, record)),
        }
    }
}

impl TranslationPipelineBuilder {
    /// Generation model for explanations and emoji; may carry a `provider:`
    /// prefix understood by [`Gateway`].
    pub fn with_text_model(mut self, text_model: impl Into<String>) -> Self {
        self.text_model = text_model.into();
        self
    }

    /// Generation model asked for hiragana readings the segmenter cannot
    /// settle. Without one, normalization relies on the segmenter alone.
    pub fn with_reading_model(mut self, reading_model: impl Into<String>) -> Self {
        self.reading_model = Some(reading_model.into());
        self
    }

    pub fn with_budgets(mut self, budgets: StageBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn build(self) -> TranslationPipeline {
        TranslationPipeline {
            gateway: self.gateway,
            segmenter: self.segmenter,
            text_model: self.text_model,
            reading_model: self.reading_model,
            budgets: self.budgets,
        }
    }
}

fn finalize(record: TranslationResult) -> StageResult {
    match record.first_missing_field() {
        None => Ok(record),
        Some(field) => Err(PipelineFailure::new(
            PipelineError::Incomplete { field },
            PipelineStage::Validating,
            record,
        )),
    }
}

fn missing(field: &'static str) -> PipelineError {
    PipelineError::Incomplete { field }
}
