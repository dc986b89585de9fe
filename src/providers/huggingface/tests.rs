use std::collections::BTreeMap;

use crate::core::error::{ConfigError, GatewayError};
use crate::core::traits::{GenerationAdapter, TranslationAdapter};
use crate::core::types::{AdapterContext, LanguageRoute, ProviderId};
use crate::providers::cache_bust::is_invisible;
use crate::providers::huggingface::HuggingFaceAdapter;
use crate::transport::http::{HttpTransport, RetryPolicy};
use crate::transport::mock_server::{MockResponse, MockServer};

fn adapter(base_url: &str, api_key: Option<&str>) -> HuggingFaceAdapter {
    let transport = HttpTransport::new(2_000, RetryPolicy::default()).expect("create transport");
    HuggingFaceAdapter::with_transport(
        api_key.map(str::to_string),
        base_url,
        "Helsinki-NLP/opus-mt-en-jap",
        transport,
    )
    .expect("create adapter")
}

#[tokio::test]
async fn test_translate_posts_inputs_to_configured_model() {
    let mut server = MockServer::start(vec![MockResponse::json(r#"[{"translation_text":"母"}]"#)]);
    let adapter = adapter(&server.url(), Some("hf_test"));

    let text = adapter
        .translate(
            "mother",
            &LanguageRoute::english_to_japanese(),
            &AdapterContext::default(),
        )
        .await
        .expect("translation succeeds");
    assert_eq!(text, "母");

    server.shutdown();
    let captured = server.captured();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path(), "/models/Helsinki-NLP/opus-mt-en-jap");
    assert_eq!(
        captured[0].headers.get("authorization"),
        Some(&"Bearer hf_test".to_string())
    );
    assert_eq!(captured[0].json(), serde_json::json!({"inputs": "mother"}));
}

#[tokio::test]
async fn test_translate_other_route_uses_opus_mt_model() {
    let mut server =
        MockServer::start(vec![MockResponse::json(r#"{"translation_text":"madre"}"#)]);
    let adapter = adapter(&server.url(), None);

    let text = adapter
        .translate(
            "mother",
            &LanguageRoute::from_english("ES"),
            &AdapterContext::default(),
        )
        .await
        .expect("translation succeeds");
    assert_eq!(text, "madre");

    server.shutdown();
    let captured = server.captured();
    assert_eq!(captured[0].path(), "/models/Helsinki-NLP/opus-mt-en-es");
    assert!(!captured[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_generate_prefixes_invisible_token() {
    let mut server = MockServer::start(vec![MockResponse::json(
        r###"[{"generated_text":"##start response##\nはは\n##end response##"}]"###,
    )]);
    let adapter = adapter(&server.url(), None);

    let text = adapter
        .generate(
            "Explain 母",
            "mistralai/Mistral-Nemo-Instruct-2407",
            &AdapterContext::default(),
        )
        .await
        .expect("generation succeeds");
    assert!(text.contains("はは"));

    server.shutdown();
    let captured = server.captured();
    assert_eq!(
        captured[0].path(),
        "/models/mistralai/Mistral-Nemo-Instruct-2407"
    );
    let body = captured[0].json();
    let inputs = body["inputs"].as_str().expect("inputs is a string");
    let prefix: String = inputs.chars().take_while(|ch| is_invisible(*ch)).collect();
    assert!(!prefix.is_empty());
    assert_eq!(&inputs[prefix.len()..], "Explain 母");
    assert_eq!(body["parameters"]["return_full_text"], false);
}

#[tokio::test]
async fn test_api_key_from_context_metadata() {
    let mut server = MockServer::start(vec![MockResponse::json(r#"{"translation_text":"母"}"#)]);
    let adapter = adapter(&server.url(), None);

    let mut metadata = BTreeMap::new();
    metadata.insert("huggingface.api_key".to_string(), "hf_ctx".to_string());
    adapter
        .translate(
            "mother",
            &LanguageRoute::english_to_japanese(),
            &AdapterContext { metadata },
        )
        .await
        .expect("translation succeeds");

    server.shutdown();
    assert_eq!(
        server.captured()[0].headers.get("authorization"),
        Some(&"Bearer hf_ctx".to_string())
    );
}

#[tokio::test]
async fn test_unauthorized_maps_to_credentials_rejected() {
    let mut server = MockServer::start(vec![MockResponse::new(
        401,
        vec![],
        r#"{"error":"Invalid credentials in Authorization header"}"#,
    )]);
    let adapter = adapter(&server.url(), Some("bad"));

    let err = adapter
        .translate(
            "mother",
            &LanguageRoute::english_to_japanese(),
            &AdapterContext::default(),
        )
        .await
        .expect_err("401 fails");
    assert!(matches!(
        err,
        GatewayError::CredentialsRejected {
            provider: ProviderId::HuggingFace,
            ..
        }
    ));
    server.shutdown();
}

#[tokio::test]
async fn test_server_error_is_status_error() {
    let mut server = MockServer::start(vec![MockResponse::new(
        503,
        vec![],
        r#"{"error":"Model is currently loading"}"#,
    )]);
    let adapter = adapter(&server.url(), None);

    let err = adapter
        .generate("p", "some/model", &AdapterContext::default())
        .await
        .expect_err("503 fails");
    match err {
        GatewayError::Status {
            status_code,
            message,
            ..
        } => {
            assert_eq!(status_code, 503);
            assert!(message.contains("loading"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    server.shutdown();
}

#[test]
fn test_empty_translation_model_is_rejected() {
    let transport = HttpTransport::new(2_000, RetryPolicy::default()).expect("create transport");
    let result = HuggingFaceAdapter::with_transport(None, "http://localhost", "  ", transport);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidProviderConfig {
            provider: ProviderId::HuggingFace,
            ..
        })
    ));
}
