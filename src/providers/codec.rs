use serde::Serialize;
use serde_json::Value;

use crate::core::error::GatewayError;

/// Provider-layer wire contract.
///
/// Adapters own auth, endpoints and transport; a codec only maps one prompt
/// or source text to the provider's request body and pulls the reply text
/// back out of its response body.
pub(crate) trait PayloadCodec {
    type RequestPayload: Serialize;

    fn encode_request(&self, input: &str, model_id: &str) -> Self::RequestPayload;

    fn decode_response(&self, body: &Value, model_id: &str) -> Result<String, GatewayError>;
}
