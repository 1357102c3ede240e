pub mod layout;
pub mod metrics;
pub mod pdf;

use crate::domain::criteria::SearchCriteria;
use crate::domain::report::{format_score, MarketReport, MarketStatistics, PropertyListing};
use crate::view::BRAND;
use chrono::NaiveDate;
use layout::{
    Cursor, Document, Font, TableSpec, TableTheme, BLACK, BOTTOM_MARGIN_MM, BRAND_BLUE,
    CONTENT_WIDTH_MM, MARGIN_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, TOP_MARGIN_MM, WHITE,
};

const HEADER_BAND_MM: f32 = 40.0;
const STATS_TABLE_Y: f32 = 85.0;
const PROPERTY_TABLE_Y: f32 = 25.0;
const SUMMARY_HEADING_GAP_MM: f32 = 15.0;
const SUMMARY_BODY_GAP_MM: f32 = 10.0;
const SUMMARY_HEADING: &str = "Market Analysis Executive Summary";
const STATS_COLUMNS: [f32; 2] = [60.0, 110.0];
const PROPERTY_COLUMNS: [f32; 5] = [40.0, 22.0, 20.0, 20.0, 68.0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// `DFWRealtor_Report_<location>.pdf`, whitespace runs and path separators
/// replaced with `_`, other control characters dropped.
pub fn file_name(location: &str) -> String {
    let mut out = String::from("DFWRealtor_Report_");
    let mut in_space = false;
    for c in location.chars() {
        if c.is_control() && !c.is_whitespace() {
            continue;
        }
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        out.push(if matches!(c, '/' | '\\' | '"') { '_' } else { c });
    }
    out.push_str(".pdf");
    out
}

pub fn stats_rows(stats: &MarketStatistics) -> Vec<Vec<String>> {
    [
        ("Median Home Price", stats.median_price.clone()),
        ("Price Trend (12m)", stats.price_trend.clone()),
        ("Days on Market", stats.days_on_market.to_string()),
        ("Inventory Level", stats.inventory_level.label().to_string()),
        ("School Rating", format!("{}/10", format_score(stats.school_rating))),
        ("Commute Score", format!("{}/100", format_score(stats.commute_score))),
        ("Rent Estimate", stats.rent_estimate.clone()),
        ("Cap Rate", stats.cap_rate.clone()),
        ("Appreciation Trend", stats.appreciation_trend.clone()),
        ("Risk Score", format!("{}/10", format_score(stats.risk_score))),
        ("Buyer Demand", format!("{}/10", format_score(stats.buyer_demand))),
        ("Seller Advantage", format!("{}/10", format_score(stats.seller_advantage))),
    ]
    .into_iter()
    .map(|(metric, value)| vec![metric.to_string(), value])
    .collect()
}

fn property_row(p: &PropertyListing) -> Vec<String> {
    vec![
        p.address.clone(),
        p.price.clone(),
        format!("{}b/{}ba", p.beds, format_score(p.baths)),
        format!("{} sqft", p.sqft),
        p.description.clone(),
    ]
}

fn headings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub fn build_document(
    report: &MarketReport,
    criteria: &SearchCriteria,
    generated_on: NaiveDate,
) -> Document {
    let mut doc = Document::new();

    doc.fill_rect(0, 0.0, 0.0, PAGE_WIDTH_MM, HEADER_BAND_MM, BRAND_BLUE);
    doc.text(0, MARGIN_MM, 25.0, 24.0, Font::Bold, WHITE, &format!("{BRAND} Market Report"));
    doc.text(
        0,
        MARGIN_MM,
        55.0,
        16.0,
        Font::Bold,
        BLACK,
        &format!("Analysis for: {}", criteria.location),
    );
    doc.text(
        0,
        MARGIN_MM,
        62.0,
        10.0,
        Font::Regular,
        BLACK,
        &format!("Generated for: {}", criteria.contact_email),
    );
    doc.text(
        0,
        MARGIN_MM,
        67.0,
        10.0,
        Font::Regular,
        BLACK,
        &format!("Date: {}", generated_on.format("%m/%d/%Y")),
    );
    doc.text(0, MARGIN_MM, 80.0, 14.0, Font::Bold, BLACK, "Key Market Indicators");

    let end = doc.place_table(
        Cursor {
            page: 0,
            y: STATS_TABLE_Y,
        },
        TableSpec {
            head: headings(&["Metric", "Value"]),
            body: stats_rows(&report.stats),
            column_widths: STATS_COLUMNS.to_vec(),
            font_size: 10.0,
            theme: TableTheme::Striped,
        },
    );

    // Heading and first narrative line stay together.
    let body_offset = SUMMARY_HEADING_GAP_MM + SUMMARY_BODY_GAP_MM;
    let summary = if end.y + body_offset > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
        Cursor {
            page: doc.add_page(),
            y: TOP_MARGIN_MM,
        }
    } else {
        Cursor {
            page: end.page,
            y: end.y + SUMMARY_HEADING_GAP_MM,
        }
    };
    doc.text(summary.page, MARGIN_MM, summary.y, 14.0, Font::Bold, BLACK, SUMMARY_HEADING);
    doc.flow_text(
        Cursor {
            page: summary.page,
            y: summary.y + SUMMARY_BODY_GAP_MM,
        },
        MARGIN_MM,
        CONTENT_WIDTH_MM,
        10.0,
        &report.narrative,
    );

    let listings = doc.add_page();
    doc.text(
        listings,
        MARGIN_MM,
        TOP_MARGIN_MM,
        14.0,
        Font::Bold,
        BLACK,
        "Featured Investment Opportunities",
    );
    doc.place_table(
        Cursor {
            page: listings,
            y: PROPERTY_TABLE_Y,
        },
        TableSpec {
            head: headings(&["Address", "Price", "Config", "Size", "Detail"]),
            body: report.properties.iter().map(property_row).collect(),
            column_widths: PROPERTY_COLUMNS.to_vec(),
            font_size: 8.0,
            theme: TableTheme::Grid,
        },
    );

    doc
}

pub fn export(
    report: &MarketReport,
    criteria: &SearchCriteria,
    generated_on: NaiveDate,
) -> anyhow::Result<ExportedFile> {
    let document = build_document(report, criteria, generated_on);
    let bytes = pdf::render_pdf(&document)?;
    let filename = file_name(&criteria.location);
    tracing::info!(
        filename = %filename,
        pages = document.pages.len(),
        bytes = bytes.len(),
        "exported market report"
    );
    Ok(ExportedFile { filename, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_criteria, sample_report};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(file_name("Deep Ellum"), "DFWRealtor_Report_Deep_Ellum.pdf");
        assert_eq!(file_name("Fort  Worth\tTX"), "DFWRealtor_Report_Fort_Worth_TX.pdf");
        assert_eq!(file_name("75201"), "DFWRealtor_Report_75201.pdf");
        assert_eq!(file_name("a/b"), "DFWRealtor_Report_a_b.pdf");
    }

    #[test]
    fn file_name_drops_control_characters() {
        assert_eq!(file_name("Plano\u{1}TX"), "DFWRealtor_Report_PlanoTX.pdf");
        assert_eq!(file_name("Plano\r\nTX\u{7f}"), "DFWRealtor_Report_Plano_TX.pdf");
        let name = file_name("Frisco\u{0}\u{1b}[31m");
        assert!(!name.chars().any(char::is_control));
    }

    fn text_position(doc: &Document, needle: &str) -> Option<(usize, f32)> {
        doc.pages.iter().enumerate().find_map(|(page, p)| {
            p.items.iter().find_map(|item| match item {
                layout::Item::Text { y, content, .. } if content == needle => Some((page, *y)),
                _ => None,
            })
        })
    }

    #[test]
    fn summary_heading_never_strands_at_page_bottom() {
        let limit = PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM;
        let mut moved = false;
        for n in 0..40 {
            let mut report = sample_report(3);
            report.stats.rent_estimate = "$2,700 per month in the core. ".repeat(n);
            report.stats.appreciation_trend = "+4.0% yearly and steady. ".repeat(n);
            let doc = build_document(&report, &sample_criteria(), date());

            let stats = &doc.tables[0];
            let (page, y) = text_position(&doc, SUMMARY_HEADING).unwrap();
            let (body_page, body_y) =
                text_position(&doc, "Deep Ellum inventory stays tight.").unwrap();
            assert!(y <= limit, "heading at {y} with {n} repeats");
            assert_eq!(page, body_page);
            assert!(body_y > y);
            assert!(body_y <= limit);
            if page != stats.final_page {
                moved = true;
                assert_eq!(y, TOP_MARGIN_MM);
            }
        }
        assert!(moved);
    }

    #[test]
    fn first_page_carries_header_and_stats() {
        let doc = build_document(&sample_report(15), &sample_criteria(), date());
        let text = doc.page_text(0);
        assert!(text.contains(&"DFWRealtor.ai Market Report"));
        assert!(text.contains(&"Analysis for: Deep Ellum"));
        assert!(text.contains(&"Generated for: buyer@example.com"));
        assert!(text.contains(&"Date: 03/09/2026"));
        assert!(text.contains(&"Market Analysis Executive Summary"));

        let stats = &doc.tables[0];
        assert_eq!(stats.head, vec!["Metric", "Value"]);
        assert_eq!(stats.rows.len(), 12);
        assert_eq!(stats.rows[0].cells, vec!["Median Home Price", "$450,000"]);
        assert_eq!(stats.rows[4].cells[1], "7/10");
        assert_eq!(stats.rows[5].cells[1], "88/100");
        assert!(stats.rows.iter().all(|r| r.page == 0));
        assert!(stats.final_y > STATS_TABLE_Y);
    }

    #[test]
    fn listings_table_keeps_input_order_on_second_page() {
        let report = sample_report(15);
        let doc = build_document(&report, &sample_criteria(), date());
        assert!(doc.page_text(1).contains(&"Featured Investment Opportunities"));

        let listings = &doc.tables[1];
        assert_eq!(listings.head, vec!["Address", "Price", "Config", "Size", "Detail"]);
        assert_eq!(listings.rows.len(), 15);
        assert!(listings.rows.iter().all(|r| r.page >= 1));
        let addresses: Vec<&str> = listings.rows.iter().map(|r| r.cells[0].as_str()).collect();
        let expected: Vec<&str> = report.properties.iter().map(|p| p.address.as_str()).collect();
        assert_eq!(addresses, expected);
        assert_eq!(listings.rows[0].cells[2], "3b/2.5ba");
        assert_eq!(listings.rows[0].cells[3], "1850 sqft");
    }

    #[test]
    fn long_narrative_spills_before_listings() {
        let mut report = sample_report(3);
        report.narrative = "The market keeps moving. ".repeat(400);
        let doc = build_document(&report, &sample_criteria(), date());
        assert!(doc.pages.len() >= 3);
        let listings = &doc.tables[1];
        assert!(listings.rows[0].page >= 2);
    }

    #[test]
    fn export_produces_named_pdf() {
        let file = export(&sample_report(15), &sample_criteria(), date()).unwrap();
        assert_eq!(file.filename, "DFWRealtor_Report_Deep_Ellum.pdf");
        assert!(file.bytes.starts_with(b"%PDF-"));
        let parsed = lopdf::Document::load_mem(&file.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 2);
    }
}
