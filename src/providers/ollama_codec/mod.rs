use serde::Serialize;
use serde_json::Value;

use crate::core::error::GatewayError;
use crate::core::types::ProviderId;
use crate::providers::codec::PayloadCodec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct OllamaGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct OllamaCodec;

impl PayloadCodec for OllamaCodec {
    type RequestPayload = OllamaGenerateRequest;

    fn encode_request(&self, input: &str, model_id: &str) -> Self::RequestPayload {
        OllamaGenerateRequest {
            model: model_id.to_string(),
            prompt: input.to_string(),
            stream: false,
        }
    }

    fn decode_response(&self, body: &Value, model_id: &str) -> Result<String, GatewayError> {
        body.get("response")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Protocol {
                provider: ProviderId::Ollama,
                model: Some(model_id.to_string()),
                request_id: None,
                message: "response has no `response` value".to_string(),
            })
    }
}
