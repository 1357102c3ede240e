use super::grid::property_grid;
use super::layout::layout;
use super::overlay::{detail_overlay, DetailSelection};
use super::AGENT_EMAIL;
use crate::domain::criteria::SearchCriteria;
use crate::domain::report::{format_score, MarketReport, SourceCitation};
use maud::{html, Markup};

pub const PDF_HREF: &str = "/report.pdf";

/// Width of a 0..=10 score bar in percent. Out-of-range scores are clamped
/// so the bar stays inside its track.
pub fn meter_width_percent(score: f64) -> f64 {
    (score * 10.0).clamp(0.0, 100.0)
}

pub fn report_page(
    report: &MarketReport,
    criteria: &SearchCriteria,
    selection: DetailSelection,
) -> Markup {
    let title = format!("{} Market Intelligence", criteria.location);
    layout(
        &title,
        None,
        html! {
            div class="container mx-auto px-4 py-8" {
                form method="post" action="/reset" class="mb-6" {
                    button type="submit" class="flex items-center text-blue-600 font-medium" {
                        i class="fas fa-arrow-left mr-2" {} " New Search"
                    }
                }
                (report_body(report, criteria, selection))
            }
        },
    )
}

pub fn report_body(
    report: &MarketReport,
    criteria: &SearchCriteria,
    selection: DetailSelection,
) -> Markup {
    let stats = &report.stats;
    html! {
        div class="space-y-8 pb-20" {
            div class="bg-white rounded-3xl shadow-sm border border-slate-200 overflow-hidden" {
                div class="bg-blue-600 px-8 py-6 flex flex-col md:flex-row justify-between items-center text-white" {
                    div {
                        h2 class="text-2xl font-bold mb-1" { (criteria.location) " Market Intelligence" }
                        p class="opacity-80 text-sm" {
                            "Real-time analysis for " (criteria.property_type) " • Goal: " (criteria.purpose)
                        }
                    }
                    a href=(PDF_HREF) class="mt-4 md:mt-0 flex items-center bg-white/10 px-4 py-2 rounded-lg font-medium" {
                        i class="fas fa-file-pdf mr-2" {} " Download Full PDF"
                    }
                }
                div class="p-8 grid grid-cols-2 md:grid-cols-4 gap-6" {
                    (score_card("Median Price", &stats.median_price, Some(&stats.price_trend), None))
                    (score_card("Days on Market", &stats.days_on_market.to_string(), None, Some("fa-clock")))
                    (score_card("Inventory", stats.inventory_level.label(), None, Some("fa-home")))
                    (score_card("School Rating", &format!("{}/10", format_score(stats.school_rating)), None, Some("fa-graduation-cap")))
                }
            }

            div class="grid grid-cols-1 lg:grid-cols-3 gap-8" {
                div class="lg:col-span-2 space-y-8" {
                    div class="bg-white rounded-3xl p-8 border border-slate-200 shadow-sm" {
                        h3 class="text-xl font-bold mb-4 flex items-center" {
                            i class="fas fa-newspaper text-blue-600 mr-3" {} " Executive Summary"
                        }
                        div class="narrative prose prose-slate max-w-none text-slate-600 leading-relaxed" style="white-space: pre-wrap" {
                            (report.narrative)
                        }
                    }
                    div id="properties-section" {
                        div class="mb-6" {
                            h3 class="text-2xl font-bold text-slate-900" { "Featured Opportunities" }
                            p class="text-slate-500" {
                                "Curated list of " (report.properties.len()) " current listings in " (criteria.location)
                            }
                        }
                        (property_grid(&report.properties))
                    }
                }

                div class="space-y-8" {
                    div class="bg-white rounded-3xl p-6 border border-slate-200 shadow-sm" {
                        h3 class="font-bold text-lg mb-4 border-b pb-2" { "Analysis Breakdown" }
                        div class="space-y-4" {
                            (meter("Buyer Advantage", stats.buyer_demand, "blue"))
                            (meter("Seller Advantage", stats.seller_advantage, "green"))
                            (meter("Risk Profile", stats.risk_score, "orange"))
                        }
                    }
                    (investor_panel(report))
                    @if !report.sources.is_empty() {
                        (sources_panel(&report.sources))
                    }
                    (lead_capture())
                }
            }

            @if let Some(property) = selection.resolve(&report.properties) {
                (detail_overlay(property))
            }
        }
    }
}

fn score_card(label: &str, value: &str, trend: Option<&str>, icon: Option<&str>) -> Markup {
    html! {
        div class="score-card flex flex-col" {
            div class="flex items-center text-slate-500 text-sm font-medium mb-1" {
                @if let Some(icon) = icon {
                    i class=(format!("fas {icon} mr-2 opacity-50")) {}
                }
                span { (label) }
            }
            div class="flex items-baseline space-x-2" {
                span class="text-2xl font-bold text-slate-900" { (value) }
                @if let Some(trend) = trend.filter(|t| !t.is_empty()) {
                    @let tone = if trend.starts_with('+') { "trend-up bg-green-100 text-green-700" } else { "trend-down bg-red-100 text-red-700" };
                    span class=(format!("text-xs font-bold px-1.5 py-0.5 rounded {tone}")) { (trend) }
                }
            }
        }
    }
}

pub fn meter(label: &str, score: f64, color: &str) -> Markup {
    let width = format!("width: {}%", format_score(meter_width_percent(score)));
    html! {
        div class=(format!("meter p-4 bg-{color}-50 rounded-2xl")) {
            p class=(format!("text-xs font-bold text-{color}-600 uppercase mb-1")) { (label) }
            div class="flex items-center" {
                div class=(format!("flex-grow bg-{color}-200 h-2 rounded-full overflow-hidden mr-3")) {
                    div class=(format!("meter-bar bg-{color}-600 h-full")) style=(width) {}
                }
                span class=(format!("font-bold text-{color}-900")) { (format_score(score)) "/10" }
            }
        }
    }
}

fn investor_panel(report: &MarketReport) -> Markup {
    let stats = &report.stats;
    html! {
        div class="investor-panel bg-slate-900 text-white rounded-3xl p-6 shadow-xl" {
            h3 class="font-bold text-lg mb-4 flex items-center" {
                i class="fas fa-coins text-yellow-500 mr-2" {} " Investor View"
            }
            div class="space-y-4" {
                div class="flex justify-between items-center border-b border-white/10 pb-2" {
                    span class="text-slate-400 text-sm" { "Est. Rent" }
                    span class="font-bold" { (stats.rent_estimate) "/mo" }
                }
                div class="flex justify-between items-center border-b border-white/10 pb-2" {
                    span class="text-slate-400 text-sm" { "Cap Rate" }
                    span class="font-bold text-green-400" { (stats.cap_rate) }
                }
                div class="flex justify-between items-center border-b border-white/10 pb-2" {
                    span class="text-slate-400 text-sm" { "Appreciation" }
                    span class="font-bold text-blue-400" { (stats.appreciation_trend) }
                }
            }
            div class="mt-6 p-4 bg-white/5 rounded-2xl text-xs text-slate-300" {
                p class="font-bold text-white mb-2 underline" { "Analyst Suggestion:" }
                (report.recommendation)
            }
        }
    }
}

pub fn sources_panel(sources: &[SourceCitation]) -> Markup {
    html! {
        div id="sources-panel" class="bg-white rounded-3xl p-6 border border-slate-200 shadow-sm" {
            h3 class="font-bold text-sm text-slate-500 uppercase tracking-widest mb-4" { "Data Sources" }
            ul class="space-y-2" {
                @for source in sources {
                    li {
                        a class="source-link text-xs text-blue-600 flex items-start" href=(source.uri) target="_blank" rel="noopener noreferrer" {
                            i class="fas fa-external-link-alt mt-0.5 mr-2 opacity-50" {}
                            span { (source.title) }
                        }
                    }
                }
            }
        }
    }
}

fn lead_capture() -> Markup {
    html! {
        div class="lead-capture bg-gradient-to-br from-blue-600 to-blue-800 rounded-3xl p-8 text-white shadow-xl relative overflow-hidden" {
            h3 class="text-2xl font-bold mb-4 leading-tight" { "Ready to take the next step in Dallas?" }
            p class="text-blue-100 text-sm mb-8 leading-relaxed" {
                "Would you like personalized properties or custom mortgage scenarios for this specific area?"
            }
            div class="space-y-3" {
                button type="button" class="w-full bg-white text-blue-600 py-3 rounded-xl font-bold flex items-center justify-center" {
                    i class="fas fa-calendar-alt mr-2" {} " Book Market Strategy Call"
                }
                a href=(format!("mailto:{AGENT_EMAIL}")) class="w-full bg-blue-500/30 text-white border border-white/20 py-3 rounded-xl font-bold flex items-center justify-center" {
                    i class="fas fa-envelope mr-2" {} " Email " (AGENT_EMAIL)
                }
            }
            p class="mt-6 text-[10px] text-blue-200 uppercase tracking-widest text-center font-bold opacity-60" {
                "Professional Realty Services • DFW Expert"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_criteria, sample_report, with_sources};

    fn render(report: &MarketReport, selection: DetailSelection) -> String {
        report_body(report, &sample_criteria(), selection).into_string()
    }

    #[test]
    fn sources_panel_absent_without_sources() {
        let html = render(&sample_report(15), DetailSelection::none());
        assert!(!html.contains("sources-panel"));
        assert!(!html.contains("source-link"));
    }

    #[test]
    fn sources_panel_renders_each_citation() {
        let report = with_sources(sample_report(15), &[("X", "http://x")]);
        let html = render(&report, DetailSelection::none());
        assert!(html.contains("sources-panel"));
        assert_eq!(html.matches("source-link").count(), 1);
        assert_eq!(html.matches(r#"href="http://x""#).count(), 1);
    }

    #[test]
    fn meter_width_is_score_times_ten() {
        assert_eq!(meter_width_percent(7.0), 70.0);
        assert_eq!(meter_width_percent(0.0), 0.0);
        assert_eq!(meter_width_percent(10.0), 100.0);
        assert_eq!(meter_width_percent(12.0), 100.0);
        let html = meter("Buyer Advantage", 7.0, "blue").into_string();
        assert!(html.contains(r#"style="width: 70%""#));
        assert!(html.contains("7/10"));
    }

    #[test]
    fn report_shows_headline_stats_and_meters() {
        let html = render(&sample_report(15), DetailSelection::none());
        assert!(html.contains("$450,000"));
        assert!(html.contains("trend-up"));
        assert!(html.contains("27"));
        assert!(html.contains("Low"));
        assert!(html.contains("7/10"));
        assert_eq!(html.matches("meter-bar").count(), 3);
        assert!(html.contains(r#"style="width: 60%""#));
        assert!(html.contains(r#"style="width: 40%""#));
        assert!(html.contains("$2,700/mo"));
        assert!(html.contains("lead-capture"));
        assert!(!html.contains("property-detail"));
    }

    #[test]
    fn falling_trend_is_marked_down() {
        let mut report = sample_report(1);
        report.stats.price_trend = "-1.4%".to_string();
        let html = render(&report, DetailSelection::none());
        assert!(html.contains("trend-down"));
    }

    #[test]
    fn selection_opens_overlay_for_that_listing() {
        let report = sample_report(15);
        let html = render(&report, DetailSelection::of(3));
        assert_eq!(html.matches("property-detail").count(), 1);
        let overlay = &html[html.find("property-detail").unwrap()..];
        assert!(overlay.contains(&report.properties[3].address));
        assert!(overlay.contains(&report.properties[3].price));
    }

    #[test]
    fn narrative_is_escaped() {
        let mut report = sample_report(1);
        report.narrative = "<script>alert(1)</script>".to_string();
        let html = render(&report, DetailSelection::none());
        assert!(!html.contains("<script>alert(1)</script>"));
    }
}
