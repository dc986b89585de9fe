use std::fmt;

use thiserror::Error;

use crate::core::types::{PartialRecord, PipelineStage, ProviderId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid provider config for {provider:?}: {reason}")]
    InvalidProviderConfig {
        provider: ProviderId,
        reason: String,
    },
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid retry policy: {reason}")]
    InvalidRetryPolicy { reason: String },
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("reading dictionary {path}: {reason}")]
    Dictionary { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no `{marker}` start marker in model response")]
    MissingStartMarker { marker: &'static str },
    #[error("no `{marker}` end marker in model response")]
    MissingEndMarker { marker: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("no generation adapter registered for provider {provider:?}")]
    ProviderNotRegistered { provider: ProviderId },
    #[error("no generation adapter can serve model {model}")]
    NoDefaultGenerator { model: String },
}

/// Failure of a model gateway call. The pipeline treats every variant as an
/// upstream error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error(
        "provider credentials rejected{context}: {message}",
        context = format_context(Some(.provider), None, .request_id.as_deref(), None)
    )]
    CredentialsRejected {
        provider: ProviderId,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider transport error{context}: {message}",
        context = format_context(Some(.provider), .model.as_deref(), None, None)
    )]
    Transport {
        provider: ProviderId,
        model: Option<String>,
        message: String,
    },
    #[error(
        "provider status error{context}: {message}",
        context = format_context(
            Some(.provider),
            .model.as_deref(),
            .request_id.as_deref(),
            Some(*.status_code)
        )
    )]
    Status {
        provider: ProviderId,
        model: Option<String>,
        status_code: u16,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider protocol error{context}: {message}",
        context = format_context(Some(.provider), .model.as_deref(), .request_id.as_deref(), None)
    )]
    Protocol {
        provider: ProviderId,
        model: Option<String>,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider serialization error{context}: {message}",
        context = format_context(Some(.provider), .model.as_deref(), .request_id.as_deref(), None)
    )]
    Serialization {
        provider: ProviderId,
        model: Option<String>,
        request_id: Option<String>,
        message: String,
    },
    #[error(transparent)]
    Routing(#[from] RoutingError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("upstream model call failed: {0}")]
    Upstream(#[from] GatewayError),
    #[error(
        "script normalization did not reach kana after {attempts} attempts (last reduction: {last_reduction:?})"
    )]
    ConversionExhausted { attempts: u32, last_reduction: String },
    #[error("explanation generation failed after {attempts} attempts: {rejected:?}")]
    Validation { attempts: u32, rejected: String },
    #[error("result incomplete: {field} was never filled")]
    Incomplete { field: &'static str },
}

/// An aborted pipeline run: the error, the stage it happened in, and every
/// field the earlier stages managed to fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineFailure<R> {
    pub error: PipelineError,
    pub stage: PipelineStage,
    pub partial: R,
}

impl<R: PartialRecord> PipelineFailure<R> {
    pub fn new(error: PipelineError, stage: PipelineStage, partial: R) -> Self {
        Self {
            error,
            stage,
            partial,
        }
    }

    /// The partial record with `error` set to the failure message.
    pub fn into_result(self) -> R {
        let message = self.to_string();
        let mut partial = self.partial;
        partial.attach_error(message);
        partial
    }
}

impl<R> fmt::Display for PipelineFailure<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pipeline failed while {}: {}", self.stage, self.error)
    }
}

impl<R: fmt::Debug> std::error::Error for PipelineFailure<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

fn format_context(
    provider: Option<&ProviderId>,
    model: Option<&str>,
    request_id: Option<&str>,
    status_code: Option<u16>,
) -> String {
    let mut context = Vec::new();

    if let Some(provider) = provider {
        context.push(format!("provider={provider:?}"));
    }
    if let Some(model) = model {
        context.push(format!("model={model}"));
    }
    if let Some(request_id) = request_id {
        context.push(format!("request_id={request_id}"));
    }
    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    if context.is_empty() {
        String::new()
    } else {
        format!(" [{}]", context.join(", "))
    }
}
