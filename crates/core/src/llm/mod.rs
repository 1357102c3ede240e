use crate::domain::criteria::SearchCriteria;
use crate::domain::report::MarketReport;

pub mod error;
pub mod fixture;
pub mod gemini;
pub mod json;
pub mod prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Fixture,
}

#[async_trait::async_trait]
pub trait ReportClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn request_report(&self, criteria: &SearchCriteria) -> anyhow::Result<MarketReport>;
}
