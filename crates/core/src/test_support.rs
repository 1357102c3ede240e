use crate::domain::criteria::{PropertyType, Purpose, SearchCriteria};
use crate::domain::report::{
    InventoryLevel, MarketReport, MarketStatistics, PropertyListing, SourceCitation,
};

pub(crate) fn sample_criteria() -> SearchCriteria {
    SearchCriteria {
        location: "Deep Ellum".to_string(),
        property_type: PropertyType::SingleFamily,
        budget: "$400k - $600k".to_string(),
        purpose: Purpose::Buy,
        contact_email: "buyer@example.com".to_string(),
    }
}

pub(crate) fn sample_listing(i: usize) -> PropertyListing {
    PropertyListing {
        address: format!("{} Commerce St, Dallas, TX 75226", 2600 + i),
        price: format!("${},000", 400 + i * 10),
        beds: 3,
        baths: 2.5,
        sqft: 1850 + i as i64,
        description: format!("Renovated loft with rooftop deck #{i}"),
        image_url: format!("https://picsum.photos/400/300?random={i}"),
        link: format!("https://www.zillow.com/homedetails/{i}"),
        score: if i == 0 { 9.0 } else { 7.0 },
    }
}

pub(crate) fn sample_report(count: usize) -> MarketReport {
    MarketReport {
        narrative: "Deep Ellum inventory stays tight.\n\nDemand from young buyers is strong."
            .to_string(),
        stats: MarketStatistics {
            median_price: "$450,000".to_string(),
            price_trend: "+3.1%".to_string(),
            days_on_market: 27,
            inventory_level: InventoryLevel::Low,
            school_rating: 7.0,
            commute_score: 88.0,
            rent_estimate: "$2,700".to_string(),
            cap_rate: "5.2%".to_string(),
            appreciation_trend: "+4.0%".to_string(),
            risk_score: 4.0,
            buyer_demand: 7.0,
            seller_advantage: 6.0,
        },
        properties: (0..count).map(sample_listing).collect(),
        recommendation: "The first loft fits the budget best.".to_string(),
        sources: Vec::new(),
    }
}

pub(crate) fn with_sources(mut report: MarketReport, sources: &[(&str, &str)]) -> MarketReport {
    report.sources = sources
        .iter()
        .map(|(title, uri)| SourceCitation {
            title: title.to_string(),
            uri: uri.to_string(),
        })
        .collect();
    report
}
