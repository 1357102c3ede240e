use crate::domain::contract::LlmMarketReport;
use crate::domain::report::{MarketReport, SourceCitation};
use crate::llm::error::{FailureKind, LlmDiagnosticsError};
use crate::llm::Provider;

/// Locates the JSON object inside a model reply: the body of a Markdown
/// code fence if the reply is fenced, otherwise the outermost `{...}` span.
pub fn extract_json(text: &str) -> Option<&str> {
    let reply = text.trim();
    if let Some(fenced) = reply.strip_prefix("```") {
        // Skip the info string (`json`) on the opening fence line.
        let body = fenced.split_once('\n').map_or("", |(_, body)| body);
        let body = body.rfind("```").map_or(body, |close| &body[..close]);
        return Some(body.trim());
    }

    match (reply.find('{'), reply.rfind('}')) {
        (Some(open), Some(close)) if open < close => Some(&reply[open..=close]),
        _ => None,
    }
}

/// Decodes the reply body into a report. Any failure is a contract
/// violation by the service, reported with the offending text attached.
pub fn parse_report(
    provider: Provider,
    text: &str,
    sources: Vec<SourceCitation>,
) -> anyhow::Result<MarketReport> {
    let body = extract_json(text).unwrap_or_else(|| text.trim());

    let parsed = serde_json::from_str::<LlmMarketReport>(body).map_err(|e| {
        LlmDiagnosticsError::new(
            provider,
            FailureKind::Contract,
            "decode",
            format!("LLM output is not valid JSON for report schema: {e}"),
        )
        .with_raw_output(text)
    })?;

    parsed.validate_and_into_report(sources).map_err(|e| {
        LlmDiagnosticsError::new(provider, FailureKind::Contract, "validate", format!("{e:#}"))
            .with_raw_output(text)
            .into()
    })
}
