use serde::Serialize;
use serde_json::Value;

use crate::core::error::GatewayError;
use crate::core::types::ProviderId;
use crate::providers::codec::PayloadCodec;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// OpenAI-compatible `chat/completions` body: one user message in, the first
/// choice's message content out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ChatCompletionsCodec {
    pub provider: ProviderId,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl PayloadCodec for ChatCompletionsCodec {
    type RequestPayload = ChatCompletionsRequest;

    fn encode_request(&self, input: &str, model_id: &str) -> Self::RequestPayload {
        ChatCompletionsRequest {
            model: model_id.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: input.to_string(),
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
        }
    }

    fn decode_response(&self, body: &Value, model_id: &str) -> Result<String, GatewayError> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Protocol {
                provider: self.provider,
                model: Some(model_id.to_string()),
                request_id: body.get("id").and_then(Value::as_str).map(str::to_string),
                message: "response has no choices[0].message.content".to_string(),
            })
    }
}
