use crate::config::Settings;
use crate::domain::criteria::SearchCriteria;
use crate::domain::report::{MarketReport, SourceCitation};
use crate::llm::error::{FailureKind, LlmDiagnosticsError};
use crate::llm::{json, prompt};
use crate::llm::{Provider, ReportClient};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const API_KEY_HEADER: &str = "x-goog-api-key";
const RESPONSE_MIME_TYPE: &str = "application/json";
const FALLBACK_SOURCE_TITLE: &str = "Source";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Builds the client even without an API key; a missing key surfaces as
    /// a failed report request.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.gemini_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("failed to build reqwest client")?;

        Ok(Self {
            http,
            api_key: settings.gemini_api_key.clone(),
            base_url: settings.gemini_base_url().to_string(),
            model: settings.gemini_model().to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(prompt: String) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: EmptyObject {},
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE,
            },
        }
    }

    async fn generate_content(
        &self,
        req: &GenerateContentRequest,
    ) -> anyhow::Result<(serde_json::Value, GenerateContentResponse)> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Configuration,
                "credentials",
                "GEMINI_API_KEY is not set",
            )
        })?;

        let res = self
            .http
            .post(self.endpoint())
            .headers(Self::auth_headers(api_key)?)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                LlmDiagnosticsError::new(
                    Provider::Gemini,
                    FailureKind::Transport,
                    "http",
                    format!("Gemini request failed: {e}"),
                )
            })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| {
            LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Transport,
                "http_body",
                format!("failed to read Gemini response body: {e}"),
            )
        })?;

        if !status.is_success() {
            let mut err = LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Service,
                "http",
                format!("status={status}"),
            )
            .with_raw_output(text.clone());
            if let Ok(raw) = serde_json::from_str::<serde_json::Value>(&text) {
                err = err.with_raw_json(raw);
            }
            return Err(err.into());
        }

        Self::decode_envelope(&text)
    }

    fn auth_headers(api_key: &str) -> anyhow::Result<HeaderMap> {
        let value = HeaderValue::from_str(api_key).map_err(|e| {
            LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Configuration,
                "credentials",
                format!("GEMINI_API_KEY is not a valid header value: {e}"),
            )
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, value);
        Ok(headers)
    }

    fn decode_envelope(
        text: &str,
    ) -> anyhow::Result<(serde_json::Value, GenerateContentResponse)> {
        let raw_json = serde_json::from_str::<serde_json::Value>(text).map_err(|e| {
            LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Service,
                "envelope",
                format!("failed to parse Gemini response JSON: {e}"),
            )
            .with_raw_output(text)
        })?;
        let parsed = serde_json::from_value::<GenerateContentResponse>(raw_json.clone()).map_err(
            |e| {
                LlmDiagnosticsError::new(
                    Provider::Gemini,
                    FailureKind::Service,
                    "envelope",
                    format!("unexpected Gemini response shape: {e}"),
                )
                .with_raw_output(text)
                .with_raw_json(raw_json.clone())
            },
        )?;
        Ok((raw_json, parsed))
    }

    /// Joins the text parts of the first candidate, skipping thought parts.
    fn response_text(
        res: &GenerateContentResponse,
        raw_json: &serde_json::Value,
    ) -> anyhow::Result<String> {
        if let Some(reason) = res
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Service,
                "prompt_feedback",
                format!("prompt blocked: {reason}"),
            )
            .with_raw_json(raw_json.clone())
            .into());
        }

        let Some(candidate) = res.candidates.first() else {
            return Err(LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Service,
                "candidates",
                "response contained no candidates",
            )
            .with_raw_json(raw_json.clone())
            .into());
        };

        let mut out = String::new();
        let parts = candidate.content.as_ref().map(|c| c.parts.as_slice()).unwrap_or_default();
        for part in parts {
            if part.thought.unwrap_or(false) {
                continue;
            }
            if let Some(text) = part.text.as_deref() {
                out.push_str(text);
            }
        }

        if out.trim().is_empty() {
            return Err(LlmDiagnosticsError::new(
                Provider::Gemini,
                FailureKind::Service,
                "content",
                format!(
                    "candidate had no text (finish_reason={})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            )
            .with_raw_json(raw_json.clone())
            .into());
        }
        Ok(out)
    }

    fn grounding_sources(res: &GenerateContentResponse) -> Vec<SourceCitation> {
        let Some(metadata) = res
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
        else {
            return Vec::new();
        };

        metadata
            .grounding_chunks
            .iter()
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
                let title = web
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or(FALLBACK_SOURCE_TITLE);
                Some(SourceCitation {
                    title: title.to_string(),
                    uri: uri.to_string(),
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ReportClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn request_report(&self, criteria: &SearchCriteria) -> anyhow::Result<MarketReport> {
        let request_id = uuid::Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(
            %request_id,
            location = %criteria.location,
            model = %self.model,
            "requesting market report"
        );

        let req = Self::request_body(prompt::build_report_prompt(criteria));
        let (raw_json, res) = self.generate_content(&req).await?;
        let text = Self::response_text(&res, &raw_json)?;
        let sources = Self::grounding_sources(&res);
        let report = json::parse_report(Provider::Gemini, &text, sources)?;

        tracing::info!(
            %request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            properties = report.properties.len(),
            sources = report.sources.len(),
            "market report decoded"
        );
        Ok(report)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct Tool {
    google_search: EmptyObject,
}

#[derive(Debug, Clone, Serialize)]
struct EmptyObject {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Clone, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}
