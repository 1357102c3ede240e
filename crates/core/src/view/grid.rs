use crate::domain::report::{format_score, PropertyListing};
use maud::{html, Markup};

/// Link that opens the detail overlay for the listing at `index`.
pub fn property_href(index: usize) -> String {
    format!("/?property={index}")
}

pub fn property_grid(properties: &[PropertyListing]) -> Markup {
    html! {
        div class="property-grid grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-6" {
            @for (idx, prop) in properties.iter().enumerate() {
                a class="property-card block bg-white rounded-3xl border border-slate-200 shadow-sm overflow-hidden" href=(property_href(idx)) {
                    div class="relative h-48 overflow-hidden" {
                        img src=(prop.image_url) class="w-full h-full object-cover" alt=(prop.address);
                        div class="absolute top-3 right-3 bg-white/95 px-3 py-1.5 rounded-full text-sm font-black text-blue-600" {
                            (prop.price)
                        }
                        @if prop.is_high_match() {
                            div class="high-match absolute top-3 left-3 bg-orange-500 text-white text-[10px] font-bold px-2 py-1 rounded-md uppercase" {
                                "High Match"
                            }
                        }
                    }
                    div class="p-5" {
                        h4 class="font-bold text-slate-900 mb-1 truncate" { (prop.address) }
                        div class="flex space-x-4 text-xs font-medium text-slate-500 mb-4" {
                            span { i class="fas fa-bed mr-1.5 opacity-60" {} (prop.beds) " Beds" }
                            span { i class="fas fa-bath mr-1.5 opacity-60" {} (format_score(prop.baths)) " Baths" }
                            span { i class="fas fa-ruler-combined mr-1.5 opacity-60" {} (prop.sqft) " sqft" }
                        }
                        p class="text-slate-600 text-sm line-clamp-2 mb-4 leading-relaxed h-10" { (prop.description) }
                        div class="pt-4 border-t border-slate-100 flex items-center justify-between" {
                            span class="text-blue-600 font-bold text-sm" { "View Details" }
                            i class="fas fa-chevron-right text-xs" {}
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_report;

    #[test]
    fn one_card_per_listing_in_order() {
        let report = sample_report(15);
        let html = property_grid(&report.properties).into_string();
        assert_eq!(html.matches("property-card").count(), 15);
        let first = html.find(&report.properties[0].address).unwrap();
        let last = html.find(&report.properties[14].address).unwrap();
        assert!(first < last);
        assert!(html.contains(r#"href="/?property=14""#));
    }

    #[test]
    fn high_match_badge_only_for_top_scores() {
        let report = sample_report(3);
        let html = property_grid(&report.properties).into_string();
        assert_eq!(html.matches("High Match").count(), 1);
    }
}
