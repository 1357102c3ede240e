use super::AGENT_EMAIL;
use crate::domain::report::{format_score, group_thousands, PropertyListing};
use maud::{html, Markup};

/// Which listing, if any, is open in the detail overlay. At most one is
/// open; selecting another replaces it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetailSelection {
    selected: Option<usize>,
}

impl DetailSelection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(index: usize) -> Self {
        Self {
            selected: Some(index),
        }
    }

    pub fn select(&mut self, index: usize) {
        self.selected = Some(index);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn index(&self) -> Option<usize> {
        self.selected
    }

    pub fn resolve<'a>(&self, properties: &'a [PropertyListing]) -> Option<&'a PropertyListing> {
        self.selected.and_then(|idx| properties.get(idx))
    }
}

pub fn detail_overlay(property: &PropertyListing) -> Markup {
    html! {
        div id="property-detail" class="fixed inset-0 z-[60] flex items-center justify-center p-4" {
            a class="overlay-backdrop absolute inset-0 bg-slate-900/60 backdrop-blur-sm" href="/" aria-label="Close" {}
            div class="relative bg-white w-full max-w-2xl rounded-3xl shadow-2xl overflow-hidden" {
                img src=(property.image_url) class="w-full h-64 object-cover" alt=(property.address);
                a class="overlay-close absolute top-4 right-4 bg-black/50 text-white w-8 h-8 rounded-full flex items-center justify-center" href="/" aria-label="Close" {
                    i class="fas fa-times" {}
                }
                div class="p-8" {
                    div class="flex justify-between items-start mb-4" {
                        div {
                            h2 class="detail-address text-2xl font-bold" { (property.address) }
                            p class="text-slate-500" { "Dallas-Fort Worth Metropolitan Area" }
                        }
                        div class="text-right" {
                            div class="detail-price text-2xl font-black text-blue-600" { (property.price) }
                            div class="text-xs font-bold text-slate-400 uppercase tracking-widest" { "List Price" }
                        }
                    }
                    div class="grid grid-cols-3 gap-4 mb-6" {
                        (fact(&property.beds.to_string(), "Beds"))
                        (fact(&format_score(property.baths), "Baths"))
                        (fact(&group_thousands(property.sqft), "Sq Ft"))
                    }
                    h3 class="font-bold mb-2" { "Listing Highlights" }
                    p class="text-slate-600 mb-8" { (property.description) }
                    div class="flex space-x-4" {
                        a href=(property.link) target="_blank" rel="noopener noreferrer"
                            class="flex-grow bg-blue-600 text-white py-4 rounded-xl font-bold text-center" {
                            "View on Marketplace"
                        }
                        a href=(format!("mailto:{AGENT_EMAIL}")) class="bg-slate-100 text-slate-900 px-6 py-4 rounded-xl font-bold" {
                            "Ask Agent"
                        }
                    }
                }
            }
        }
    }
}

fn fact(value: &str, label: &str) -> Markup {
    html! {
        div class="bg-slate-50 p-3 rounded-2xl text-center" {
            div class="text-lg font-bold" { (value) }
            div class="text-xs text-slate-500 uppercase" { (label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_report;

    #[test]
    fn selecting_index_resolves_that_listing() {
        let report = sample_report(15);
        let selection = DetailSelection::of(3);
        let property = selection.resolve(&report.properties).unwrap();
        assert_eq!(property, &report.properties[3]);

        let html = detail_overlay(property).into_string();
        assert!(html.contains(&report.properties[3].address));
        assert!(html.contains(&report.properties[3].price));
        assert!(!html.contains(&report.properties[4].address));
    }

    #[test]
    fn selecting_again_replaces_and_close_clears() {
        let mut selection = DetailSelection::none();
        selection.select(3);
        selection.select(5);
        assert_eq!(selection.index(), Some(5));
        selection.close();
        assert_eq!(selection.index(), None);
    }

    #[test]
    fn out_of_range_selection_resolves_to_nothing() {
        let report = sample_report(2);
        assert!(DetailSelection::of(7).resolve(&report.properties).is_none());
    }

    #[test]
    fn overlay_formats_square_feet() {
        let mut property = sample_report(1).properties.remove(0);
        property.sqft = 2450;
        let html = detail_overlay(&property).into_string();
        assert!(html.contains("2,450"));
        assert_eq!(html.matches(r#"href="/""#).count(), 2);
    }
}
