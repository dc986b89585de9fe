use serde::Serialize;
use serde_json::Value;

use crate::core::error::GatewayError;
use crate::core::types::ProviderId;
use crate::providers::codec::PayloadCodec;

/// Which inference task the hosted model runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HfTask {
    Translation,
    TextGeneration,
}

impl HfTask {
    fn output_field(self) -> &'static str {
        match self {
            Self::Translation => "translation_text",
            Self::TextGeneration => "generated_text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct HfInferenceRequest {
    pub inputs: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<HfParameters>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct HfParameters {
    pub return_full_text: bool,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct HuggingFaceCodec {
    pub task: HfTask,
}

impl PayloadCodec for HuggingFaceCodec {
    type RequestPayload = HfInferenceRequest;

    fn encode_request(&self, input: &str, _model_id: &str) -> Self::RequestPayload {
        let parameters = match self.task {
            HfTask::Translation => None,
            HfTask::TextGeneration => Some(HfParameters {
                return_full_text: false,
            }),
        };

        HfInferenceRequest {
            inputs: input.to_string(),
            parameters,
        }
    }

    fn decode_response(&self, body: &Value, model_id: &str) -> Result<String, GatewayError> {
        let field = self.task.output_field();

        // the inference API answers with either an object or a one-element list
        let record = match body {
            Value::Array(items) => items.first(),
            other => Some(other),
        };

        if let Some(text) = record
            .and_then(|record| record.get(field))
            .and_then(Value::as_str)
        {
            return Ok(text.to_string());
        }

        let message = match body.get("error").and_then(Value::as_str) {
            Some(error) => format!("inference error: {error}"),
            None => format!("response has no `{field}` value"),
        };

        Err(GatewayError::Protocol {
            provider: ProviderId::HuggingFace,
            model: Some(model_id.to_string()),
            request_id: None,
            message,
        })
    }
}
