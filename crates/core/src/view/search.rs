use super::layout::{alert_dialog, layout};
use crate::domain::criteria::{PropertyType, Purpose, SearchForm};
use maud::{html, Markup};

/// Landing page with the search form. `alerts` are rendered as blocking
/// dialogs, one per pending message.
pub fn search_page(form: &SearchForm, alerts: &[String]) -> Markup {
    layout(
        "DFW Real Estate Market Intelligence",
        None,
        html! {
            div class="max-w-4xl mx-auto px-4 py-12 md:py-24" {
                div class="text-center mb-12" {
                    h1 class="text-4xl md:text-6xl font-extrabold text-slate-900 mb-6 leading-tight" {
                        "Dallas Real Estate " span class="text-blue-600" { "Market Intelligence" }
                    }
                    p class="text-lg md:text-xl text-slate-600 max-w-2xl mx-auto" {
                        "Enter any DFW zip code, neighborhood, or landmark to get a comprehensive property analysis report powered by Gemini AI."
                    }
                }
                (search_form(form))
                (feature_tiles())
            }
            @for message in alerts {
                (alert_dialog(message))
            }
        },
    )
}

pub fn search_form(form: &SearchForm) -> Markup {
    html! {
        form id="search-form" method="post" action="/search" class="bg-white rounded-3xl shadow-2xl p-6 md:p-8 border border-slate-100" {
            div class="grid grid-cols-1 md:grid-cols-2 gap-6" {
                div class="col-span-full" {
                    label class="block text-sm font-semibold text-slate-700 mb-2" for="location" {
                        "Zip Code, Neighborhood, or Landmark"
                    }
                    input type="text" id="location" name="location"
                        placeholder="e.g. 75201, Frisco, AT&T Stadium..."
                        value=(form.location)
                        class="w-full pl-11 pr-4 py-4 rounded-xl border border-slate-200"
                        required;
                }
                div {
                    label class="block text-sm font-semibold text-slate-700 mb-2" for="property_type" { "Property Type" }
                    select id="property_type" name="property_type" class="w-full px-4 py-4 rounded-xl border border-slate-200 bg-white" {
                        @for kind in PropertyType::ALL {
                            option value=(kind.label()) selected[kind == form.property_type] { (kind.label()) }
                        }
                    }
                }
                div {
                    label class="block text-sm font-semibold text-slate-700 mb-2" for="purpose" { "Your Goal" }
                    select id="purpose" name="purpose" class="w-full px-4 py-4 rounded-xl border border-slate-200 bg-white" {
                        @for purpose in Purpose::ALL {
                            option value=(purpose.label()) selected[purpose == form.purpose] { (purpose.label()) }
                        }
                    }
                }
                div {
                    label class="block text-sm font-semibold text-slate-700 mb-2" for="budget" { "Budget Range" }
                    input type="text" id="budget" name="budget"
                        placeholder="e.g. $400k - $600k"
                        value=(form.budget)
                        class="w-full px-4 py-4 rounded-xl border border-slate-200";
                }
                div {
                    label class="block text-sm font-semibold text-slate-700 mb-2" for="email" { "Email for Detailed PDF" }
                    input type="email" id="email" name="email"
                        placeholder="john@example.com"
                        value=(form.contact_email)
                        class="w-full px-4 py-4 rounded-xl border border-slate-200"
                        required;
                }
            }
            button type="submit" class="w-full mt-8 bg-blue-600 text-white py-4 rounded-xl font-bold text-lg flex items-center justify-center space-x-2" {
                span { "Analyze Market" }
                i class="fas fa-search" {}
            }
            p class="mt-4 text-center text-xs text-slate-400 uppercase tracking-widest font-semibold" {
                "Instant AI Analysis • Local DFW Data • No Login Required"
            }
        }
    }
}

fn feature_tiles() -> Markup {
    let tiles = [
        ("fa-chart-line", "Real-Time Trends", "Latest median prices and inventory shifts across DFW metroplex."),
        ("fa-calculator", "Investor Analysis", "Cap rates, rent estimates, and cash flow projections in seconds."),
        ("fa-school", "Hyper-Local Data", "School ratings, crime indices, and commute heatmaps for every zip."),
    ];
    html! {
        div class="mt-16 grid grid-cols-1 md:grid-cols-3 gap-8 text-center" {
            @for (icon, title, blurb) in tiles {
                div class="p-6" {
                    div class="w-12 h-12 bg-blue-100 text-blue-600 rounded-lg flex items-center justify-center mx-auto mb-4" {
                        i class=(format!("fas {icon} text-xl")) {}
                    }
                    h3 class="font-bold text-lg mb-2" { (title) }
                    p class="text-slate-500 text-sm" { (blurb) }
                }
            }
        }
    }
}
