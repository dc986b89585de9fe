use std::sync::Arc;

use tracing::{Instrument, error, info, info_span};

use super::{StageBudgets, missing, stages};
use crate::core::error::{PipelineError, PipelineFailure};
use crate::core::traits::ModelGateway;
use crate::core::types::{LanguageRoute, OtherTranslationRequest, PipelineStage, TranslatedResult};

type StageResult = Result<TranslatedResult, PipelineFailure<TranslatedResult>>;

/// English to any target language: translate, explain, annotate. No script
/// normalization; explanation and emoji follow the same rules as the
/// Japanese pipeline.
pub struct OtherLanguagePipeline {
    gateway: Arc<dyn ModelGateway>,
    text_model: String,
    budgets: StageBudgets,
}

impl OtherLanguagePipeline {
    pub fn new(gateway: Arc<dyn ModelGateway>, text_model: String, budgets: StageBudgets) -> Self {
        Self {
            gateway,
            text_model,
            budgets,
        }
    }

    pub async fn execute(&self, request: &OtherTranslationRequest) -> StageResult {
        let route = LanguageRoute::from_english(&request.target_lang);
        let span = info_span!(
            "other_language_pipeline",
            input = %request.input_text,
            %route
        );

        async move {
            let outcome = self
                .run_stages(TranslatedResult::for_request(request), &route)
                .await;
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

    async fn run_stages(&self, mut record: TranslatedResult, route: &LanguageRoute) -> StageResult {
        match self.gateway.translate(&record.name_english, route).await {
            Ok(translation) => record.original_ai_translation = Some(translation),
            Err(error) => {
                return Err(PipelineFailure::new(
                    error.into(),
                    PipelineStage::Translating,
                    record,
                ));
            }
        }
        let Some(translation) = record.original_ai_translation.clone() else {
            return Err(PipelineFailure::new(
                missing("originalAiTranslation"),
                PipelineStage::Translating,
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
            Ok(explanation) => record.explanation = Some(explanation),
            Err(error) => {
                return Err(PipelineFailure::new(
                    error,
                    PipelineStage::Explaining,
                    record,
                ));
            }
        }

        match stages::annotate(
            self.gateway.as_ref(),
            &translation,
            &self.text_model,
            self.budgets.emoji,
        )
        .await
        {
            Ok(emoji) => record.emoji = Some(emoji),
            Err(error) => {
                return Err(PipelineFailure::new(
                    error,
                    PipelineStage::Annotating,
                    record,
                ));
            }
        }

        match record.first_missing_field() {
            None => Ok(record),
            Some(field) => Err(PipelineFailure::new(
                PipelineError::Incomplete { field },
                PipelineStage::Validating,
                record,
            )),
        }
    }
}
