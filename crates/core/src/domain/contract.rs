use crate::domain::report::{
    InventoryLevel, MarketReport, MarketStatistics, PropertyListing, SourceCitation,
    EXPECTED_PROPERTY_COUNT,
};
use anyhow::{bail, ensure};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmMarketReport {
    pub narrative: String,
    pub stats: LlmMarketStats,
    pub properties: Vec<LlmPropertyListing>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmMarketStats {
    #[serde(deserialize_with = "text")]
    pub median_price: String,
    #[serde(deserialize_with = "text")]
    pub price_trend: String,
    #[serde(deserialize_with = "number")]
    pub days_on_market: f64,
    pub inventory_level: String,
    #[serde(deserialize_with = "number")]
    pub school_rating: f64,
    #[serde(deserialize_with = "number")]
    pub commute_score: f64,
    #[serde(deserialize_with = "text")]
    pub rent_estimate: String,
    #[serde(deserialize_with = "text")]
    pub cap_rate: String,
    #[serde(deserialize_with = "text")]
    pub appreciation_trend: String,
    #[serde(deserialize_with = "number")]
    pub risk_score: f64,
    #[serde(deserialize_with = "number")]
    pub buyer_demand: f64,
    #[serde(deserialize_with = "number")]
    pub seller_advantage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmPropertyListing {
    pub address: String,
    #[serde(deserialize_with = "text")]
    pub price: String,
    #[serde(deserialize_with = "number")]
    pub beds: f64,
    #[serde(deserialize_with = "number")]
    pub baths: f64,
    #[serde(deserialize_with = "number")]
    pub sqft: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link: String,
    #[serde(deserialize_with = "number")]
    pub score: f64,
}

impl LlmMarketReport {
    /// Checks the decoded body and builds the report. Listings beyond the
    /// expected count are dropped; a short list is kept, an empty one is not.
    pub fn validate_and_into_report(
        self,
        sources: Vec<SourceCitation>,
    ) -> anyhow::Result<MarketReport> {
        let narrative = self.narrative.trim().to_string();
        ensure!(!narrative.is_empty(), "narrative must be non-empty");

        ensure!(
            !self.properties.is_empty(),
            "LLM output must contain at least one property (expected {EXPECTED_PROPERTY_COUNT})"
        );

        let received = self.properties.len();
        if received != EXPECTED_PROPERTY_COUNT {
            tracing::warn!(
                received,
                expected = EXPECTED_PROPERTY_COUNT,
                "property count differs from contract"
            );
        }

        let properties = self
            .properties
            .into_iter()
            .take(EXPECTED_PROPERTY_COUNT)
            .enumerate()
            .map(|(idx, p)| p.validate_and_into_listing(idx))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(MarketReport {
            narrative,
            stats: self.stats.validate_and_into_stats()?,
            properties,
            recommendation: self.recommendation.trim().to_string(),
            sources,
        })
    }
}

impl LlmMarketStats {
    fn validate_and_into_stats(self) -> anyhow::Result<MarketStatistics> {
        let inventory_level = parse_inventory_level(&self.inventory_level)?;
        Ok(MarketStatistics {
            median_price: self.median_price.trim().to_string(),
            price_trend: self.price_trend.trim().to_string(),
            days_on_market: self.days_on_market.round() as i64,
            inventory_level,
            school_rating: self.school_rating,
            commute_score: self.commute_score,
            rent_estimate: self.rent_estimate.trim().to_string(),
            cap_rate: self.cap_rate.trim().to_string(),
            appreciation_trend: self.appreciation_trend.trim().to_string(),
            risk_score: self.risk_score,
            buyer_demand: self.buyer_demand,
            seller_advantage: self.seller_advantage,
        })
    }
}

impl LlmPropertyListing {
    fn validate_and_into_listing(self, idx: usize) -> anyhow::Result<PropertyListing> {
        let address = self.address.trim().to_string();
        ensure!(!address.is_empty(), "property {idx}: address must be non-empty");

        Ok(PropertyListing {
            address,
            price: self.price.trim().to_string(),
            beds: self.beds.round() as i64,
            baths: self.baths,
            sqft: self.sqft.round() as i64,
            description: self.description.trim().to_string(),
            image_url: self.image_url.trim().to_string(),
            link: self.link.trim().to_string(),
            score: self.score,
        })
    }
}

fn parse_inventory_level(raw: &str) -> anyhow::Result<InventoryLevel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "low" => Ok(InventoryLevel::Low),
        "medium" | "moderate" => Ok(InventoryLevel::Medium),
        "high" => Ok(InventoryLevel::High),
        other => bail!("inventoryLevel must be Low, Medium or High (got {other:?})"),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

/// Accepts `7`, `7.5` or `"7"`; strips `$`, `,` and `%` from strings.
fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(n),
        Scalar::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
                .collect();
            cleaned
                .parse::<f64>()
                .map_err(|_| serde::de::Error::custom(format!("expected a number, got {s:?}")))
        }
    }
}

/// Accepts a string or a bare number (e.g. `"medianPrice": 450000`).
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => Ok(crate::domain::report::format_score(n)),
        Scalar::Text(s) => Ok(s),
    }
}
