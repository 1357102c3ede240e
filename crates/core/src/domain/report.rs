use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of listings the report contract asks the service for.
pub const EXPECTED_PROPERTY_COUNT: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketReport {
    pub narrative: String,
    pub stats: MarketStatistics,
    pub properties: Vec<PropertyListing>,
    pub recommendation: String,
    pub sources: Vec<SourceCitation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStatistics {
    pub median_price: String,
    pub price_trend: String,
    pub days_on_market: i64,
    pub inventory_level: InventoryLevel,
    pub school_rating: f64,
    pub commute_score: f64,
    pub rent_estimate: String,
    pub cap_rate: String,
    pub appreciation_trend: String,
    pub risk_score: f64,
    pub buyer_demand: f64,
    pub seller_advantage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryLevel {
    Low,
    Medium,
    High,
}

impl InventoryLevel {
    pub fn label(self) -> &'static str {
        match self {
            InventoryLevel::Low => "Low",
            InventoryLevel::Medium => "Medium",
            InventoryLevel::High => "High",
        }
    }
}

impl fmt::Display for InventoryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    pub address: String,
    pub price: String,
    pub beds: i64,
    pub baths: f64,
    pub sqft: i64,
    pub description: String,
    pub image_url: String,
    pub link: String,
    /// Match against the user's criteria, 1..=10 by contract.
    pub score: f64,
}

impl PropertyListing {
    pub fn is_high_match(&self) -> bool {
        self.score >= 9.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub title: String,
    pub uri: String,
}

/// Formats a score the way the service sent it: `7` rather than `7.0`.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// `12500` -> `12,500`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
