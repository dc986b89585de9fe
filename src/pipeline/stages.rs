use tracing::{debug, warn};

use crate::core::error::{GatewayError, PipelineError};
use crate::core::traits::{ModelGateway, Segmenter};
use crate::core::types::{ScriptKind, Token};
use crate::extract::extract;
use crate::pipeline::prompts::{emoji_prompt, explanation_prompt, reading_prompt};
use crate::retry::{RetryBudget, RetryOutcome, retry_until};
use crate::script::{classify, is_kanji, katakana_to_hiragana, reading_of_tokens};

/// A generated reply is usable when it is not blank and carries no bracket,
/// since brackets mean the model echoed the template placeholder.
pub fn is_valid_reply(text: &str) -> bool {
    !text.contains('[') && !text.contains(']') && !text.trim().is_empty()
}

/// Model asked for readings the dictionary cannot settle.
#[derive(Clone, Copy)]
pub(crate) struct ReadingModel<'a> {
    pub gateway: &'a dyn ModelGateway,
    pub model_id: &'a str,
}

/// Reduces `translation` to hiragana, re-reading the original text on every
/// attempt. Returns the hiragana or `ConversionExhausted`.
///
/// The segmenter's reading is taken when it is kana and settles the text:
/// no kanji at all, or one entry covering the whole translation. Anything
/// else goes to the reading model when there is one; without it the
/// segmenter's best-effort reduction is classified as is.
pub(crate) async fn normalize_script(
    segmenter: &dyn Segmenter,
    reader: Option<ReadingModel<'_>>,
    translation: &str,
    budget: RetryBudget,
) -> Result<String, PipelineError> {
    let outcome = retry_until(
        "normalize_script",
        budget,
        |attempt| async move {
            let tokens = segmenter.segment(translation);
            let settled = settles(&tokens, translation);
            let dictionary = reading_of_tokens(tokens);

            let reduction = match reader {
                Some(reader) if !(settled && classify(&dictionary).is_kana()) => {
                    read_with_model(reader, translation, attempt).await?
                }
                _ => dictionary,
            };
            let kind = classify(&reduction);
            debug!(attempt, %reduction, ?kind, "reduced translation");
            Ok::<_, GatewayError>((kind, reduction))
        },
        |(kind, _)| kind.is_kana(),
    )
    .await?;

    match outcome {
        RetryOutcome::Accepted {
            value: (ScriptKind::Katakana, reduction),
            ..
        } => Ok(katakana_to_hiragana(&reduction)),
        RetryOutcome::Accepted {
            value: (_, reduction),
            ..
        } => Ok(reduction),
        RetryOutcome::Exhausted {
            last: (_, last_reduction),
            attempts,
        } => Err(PipelineError::ConversionExhausted {
            attempts,
            last_reduction,
        }),
    }
}

fn settles(tokens: &[Token], text: &str) -> bool {
    if !text.chars().any(is_kanji) {
        return true;
    }
    matches!(tokens, [Token { surface, reading: Some(_) }] if surface == text)
}

/// A reply without an answer block reads as empty and is rejected.
async fn read_with_model(
    reader: ReadingModel<'_>,
    translation: &str,
    attempt: u32,
) -> Result<String, GatewayError> {
    let raw = reader
        .gateway
        .generate(&reading_prompt(translation), reader.model_id)
        .await?;

    match extract(&raw) {
        Ok(reading) => Ok(katakana_to_hiragana(&reading)
            .chars()
            .filter(|ch| !ch.is_whitespace() && !matches!(ch, '"' | '「' | '」' | '。' | '、'))
            .collect()),
        Err(error) => {
            warn!(attempt, %error, raw = %raw, "reading reply has no answer block");
            Ok(String::new())
        }
    }
}

/// One generate+extract cycle per attempt until the reply passes
/// [`is_valid_reply`]. A reply without an answer block counts as a rejected
/// empty candidate.
async fn generate_validated(
    gateway: &dyn ModelGateway,
    step: &'static str,
    prompt: &str,
    model_id: &str,
    budget: RetryBudget,
) -> Result<RetryOutcome<String>, GatewayError> {
    retry_until(
        step,
        budget,
        |attempt| async move {
            let raw = gateway.generate(prompt, model_id).await?;
            Ok::<_, GatewayError>(match extract(&raw) {
                Ok(candidate) => candidate,
                Err(error) => {
                    warn!(step, attempt, %error, raw = %raw, "reply has no answer block");
                    String::new()
                }
            })
        },
        |candidate| is_valid_reply(candidate),
    )
    .await
}

pub(crate) async fn explain(
    gateway: &dyn ModelGateway,
    term: &str,
    model_id: &str,
    budget: RetryBudget,
) -> Result<String, PipelineError> {
    let prompt = explanation_prompt(term);
    match generate_validated(gateway, "explain", &prompt, model_id, budget).await? {
        RetryOutcome::Accepted { value, .. } => Ok(value),
        RetryOutcome::Exhausted { last, attempts } => Err(PipelineError::Validation {
            attempts,
            rejected: last,
        }),
    }
}

/// The emoji is cosmetic: after the budget runs out the last candidate is
/// kept as is, valid or not. Gateway failures still propagate.
pub(crate) async fn annotate(
    gateway: &dyn ModelGateway,
    term: &str,
    model_id: &str,
    budget: RetryBudget,
) -> Result<String, PipelineError> {
    let prompt = emoji_prompt(term);
    let outcome = generate_validated(gateway, "annotate", &prompt, model_id, budget).await?;
    if !outcome.is_accepted() {
        warn!(attempts = outcome.attempts(), "settling on invalid emoji");
    }
    Ok(outcome.into_value())
}
