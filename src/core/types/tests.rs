use super::*;
use serde_json::json;

#[test]
fn test_translation_result_serializes_camel_case_with_nulls() {
    let result = TranslationResult::for_request(&TranslationRequest::new("mother"));

    let value = serde_json::to_value(&result).expect("result should serialize");
    assert_eq!(value.get("nameEnglish"), Some(&json!("mother")));
    assert_eq!(value.get("nameHiragana"), Some(&json!(null)));
    assert_eq!(value.get("originalAiTranslation"), Some(&json!(null)));
    assert!(value.get("error").is_none());
}

#[test]
fn test_first_missing_field_follows_stage_order() {
    let mut result = TranslationResult::for_request(&TranslationRequest::new("mother"));
    assert_eq!(result.first_missing_field(), Some("originalAiTranslation"));

    result.original_ai_translation = Some("母".to_string());
    result.name_hiragana = Some("はは".to_string());
    result.name_katakana = Some("ハハ".to_string());
    result.name_romaji = Some("haha".to_string());
    assert_eq!(result.first_missing_field(), Some("explanation"));

    result.explanation = Some("Mother.".to_string());
    result.emoji = Some(String::new());
    assert_eq!(result.first_missing_field(), None);
}

#[test]
fn test_attach_error_keeps_partial_fields() {
    let mut result = TranslatedResult::for_request(&OtherTranslationRequest::new("fish", "fr"));
    result.original_ai_translation = Some("poisson".to_string());
    result.attach_error("explanation generation failed".to_string());

    assert_eq!(result.name_english, "fish");
    assert_eq!(result.original_ai_translation.as_deref(), Some("poisson"));
    assert_eq!(
        result.error.as_deref(),
        Some("explanation generation failed")
    );

    let value = serde_json::to_value(&result).expect("result should serialize");
    assert_eq!(
        value.get("error"),
        Some(&json!("explanation generation failed"))
    );
}

#[test]
fn test_language_route_normalizes_codes() {
    let route = LanguageRoute::new(" EN ", "Ja");
    assert!(route.is_english_to_japanese());
    assert_eq!(route.to_string(), "en->ja");
    assert_eq!(LanguageRoute::from_english("FR").target_lang, "fr");
}

#[test]
fn test_provider_id_parse_aliases() {
    assert_eq!(ProviderId::parse("HF"), Some(ProviderId::HuggingFace));
    assert_eq!(ProviderId::parse("openai"), Some(ProviderId::ChatGpt));
    assert_eq!(ProviderId::parse("ollama"), Some(ProviderId::Ollama));
    assert_eq!(ProviderId::parse("llama3"), None);
    assert_eq!(ProviderId::parse("custom"), None);
    assert_eq!(ProviderId::DeepSeek.as_str(), "deepseek");
}

#[test]
fn test_request_rejects_unknown_fields() {
    let err = serde_json::from_value::<TranslationRequest>(json!({
        "inputText": "mother",
        "unexpected": true
    }))
    .expect_err("unknown fields should fail");
    assert!(err.to_string().contains("unknown field"));

    let request: OtherTranslationRequest =
        serde_json::from_value(json!({ "inputText": "fish", "targetLang": "fr" }))
            .expect("request should deserialize");
    assert_eq!(request, OtherTranslationRequest::new("fish", "fr"));
}

#[test]
fn test_pipeline_stage_names() {
    assert_eq!(PipelineStage::NormalizingScript.to_string(), "normalizing_script");
    assert_eq!(PipelineStage::Done.to_string(), "done");
    assert_eq!(PipelineStage::Failed.to_string(), "failed");
    assert_eq!(
        serde_json::to_value(PipelineStage::Failed).expect("stage should serialize"),
        json!("failed")
    );
}
