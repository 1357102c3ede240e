use crate::domain::criteria::SearchCriteria;
use crate::domain::report::{MarketReport, SourceCitation};
use crate::llm::{json, Provider, ReportClient};
use anyhow::Context;
use std::path::Path;

/// Replays a recorded report body through the same decode path as the live
/// client. Used for offline demos and tests.
#[derive(Debug, Clone)]
pub struct FixtureClient {
    body: String,
    sources: Vec<SourceCitation>,
}

impl FixtureClient {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sources: Vec::new(),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        Ok(Self::new(body))
    }

    pub fn with_sources(mut self, sources: Vec<SourceCitation>) -> Self {
        self.sources = sources;
        self
    }
}

#[async_trait::async_trait]
impl ReportClient for FixtureClient {
    fn provider(&self) -> Provider {
        Provider::Fixture
    }

    async fn request_report(&self, criteria: &SearchCriteria) -> anyhow::Result<MarketReport> {
        tracing::debug!(location = %criteria.location, "replaying fixture report");
        json::parse_report(Provider::Fixture, &self.body, self.sources.clone())
    }
}
