use crate::core::error::GatewayError;
use crate::core::types::ProviderId;
use crate::providers::{map_auth_status, normalize_base_url, sanitize_api_key};

#[test]
fn test_normalize_base_url_trims_and_defaults() {
    assert_eq!(
        normalize_base_url(" http://localhost:11434/api/ ", "http://default"),
        "http://localhost:11434/api"
    );
    assert_eq!(normalize_base_url("   ", "http://default"), "http://default");
}

#[test]
fn test_sanitize_api_key_drops_blank_values() {
    assert_eq!(sanitize_api_key(Some("  sk-1 ".to_string())), Some("sk-1".to_string()));
    assert_eq!(sanitize_api_key(Some("   ".to_string())), None);
    assert_eq!(sanitize_api_key(None), None);
}

#[test]
fn test_map_auth_status_only_touches_auth_codes() {
    let status = |status_code| GatewayError::Status {
        provider: ProviderId::ChatGpt,
        model: Some("gpt-3.5-turbo".to_string()),
        status_code,
        request_id: Some("req_1".to_string()),
        message: "nope".to_string(),
    };

    assert_eq!(
        map_auth_status(status(401)),
        GatewayError::CredentialsRejected {
            provider: ProviderId::ChatGpt,
            request_id: Some("req_1".to_string()),
            message: "nope".to_string(),
        }
    );
    assert!(matches!(
        map_auth_status(status(403)),
        GatewayError::CredentialsRejected { .. }
    ));
    assert_eq!(map_auth_status(status(500)), status(500));
}
