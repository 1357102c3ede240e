use crate::llm::Provider;
use serde_json::Value;
use std::fmt;

/// Separates "the service could not be reached or refused" from
/// "the service answered but broke the report contract".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Configuration,
    Transport,
    Service,
    Contract,
}

#[derive(Debug, Clone)]
pub struct LlmDiagnosticsError {
    pub provider: Provider,
    pub kind: FailureKind,
    pub stage: &'static str,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl LlmDiagnosticsError {
    pub fn new(
        provider: Provider,
        kind: FailureKind,
        stage: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            kind,
            stage,
            detail: detail.into(),
            raw_output: None,
            raw_response_json: None,
        }
    }

    pub fn with_raw_output(mut self, raw: impl Into<String>) -> Self {
        self.raw_output = Some(raw.into());
        self
    }

    pub fn with_raw_json(mut self, raw: Value) -> Self {
        self.raw_response_json = Some(raw);
        self
    }
}

impl fmt::Display for LlmDiagnosticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLM error (provider={:?}, kind={:?}, stage={}): {}",
            self.provider, self.kind, self.stage, self.detail
        )
    }
}

impl std::error::Error for LlmDiagnosticsError {}

/// Failure kind of an error chain, if it carries diagnostics.
pub fn failure_kind(err: &anyhow::Error) -> Option<FailureKind> {
    err.downcast_ref::<LlmDiagnosticsError>().map(|d| d.kind)
}
