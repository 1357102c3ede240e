use super::{AGENT_EMAIL, BRAND};
use maud::{html, Markup, DOCTYPE};

/// Full page shell: header (logo resets the search), content, footer.
/// `refresh_secs` makes the browser poll, used while a report is loading.
pub fn layout(title: &str, refresh_secs: Option<u32>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if let Some(secs) = refresh_secs {
                    meta http-equiv="refresh" content=(secs);
                }
                title { (title) }
                link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css";
                script src="https://cdn.tailwindcss.com" {}
            }
            body class="min-h-screen flex flex-col" {
                (header())
                main class="flex-grow" { (content) }
                (footer())
            }
        }
    }
}

fn header() -> Markup {
    html! {
        header class="bg-white border-b border-slate-200 sticky top-0 z-50" {
            div class="container mx-auto px-4 h-16 flex items-center justify-between" {
                form method="post" action="/reset" {
                    button type="submit" class="flex items-center space-x-2" {
                        div class="bg-blue-600 p-1.5 rounded-lg" { i class="fas fa-city text-white" {} }
                        span class="font-bold text-xl text-slate-900 tracking-tight" { (BRAND) }
                    }
                }
                nav class="hidden md:flex space-x-8" {
                    a href="#" class="text-slate-600 text-sm font-medium" { "Markets" }
                    a href="#" class="text-slate-600 text-sm font-medium" { "Resources" }
                    a href="#" class="text-slate-600 text-sm font-medium" { "For Agents" }
                }
                a href=(format!("mailto:{AGENT_EMAIL}")) class="bg-slate-900 text-white px-4 py-2 rounded-full text-sm font-semibold" {
                    "Contact Agent"
                }
            }
        }
    }
}

fn footer() -> Markup {
    html! {
        footer class="bg-slate-900 text-white py-12" {
            div class="container mx-auto px-4 text-center" {
                div class="flex items-center justify-center mb-6" {
                    i class="fas fa-city text-blue-400 text-2xl mr-2" {}
                    span class="font-bold text-xl tracking-tight" { (BRAND) }
                }
                p class="text-slate-400 text-sm mb-4" {
                    "Helping Dallas-Fort Worth residents make smarter real estate decisions through AI."
                }
                div class="mt-8 pt-8 border-t border-slate-800 text-slate-500 text-xs" {
                    "© " (BRAND) ". All rights reserved. Not financial advice."
                }
            }
        }
    }
}

/// Blocking alert shown on top of the page until dismissed.
pub fn alert_dialog(message: &str) -> Markup {
    html! {
        div class="alert-modal fixed inset-0 z-[200] flex items-center justify-center bg-slate-900/60" role="alertdialog" aria-modal="true" {
            div class="bg-white rounded-2xl p-6 max-w-sm text-center shadow-2xl" {
                p class="alert-message text-slate-800 mb-6" { (message) }
                a href="/" class="bg-blue-600 text-white px-6 py-2 rounded-xl font-bold" { "OK" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_meta_only_when_requested() {
        let polling = layout("t", Some(2), html! {}).into_string();
        assert!(polling.contains(r#"<meta http-equiv="refresh" content="2">"#));
        let still = layout("t", None, html! {}).into_string();
        assert!(!still.contains("http-equiv"));
    }

    #[test]
    fn alert_text_is_escaped() {
        let markup = alert_dialog("<b>oops</b>").into_string();
        assert!(markup.contains("&lt;b&gt;oops&lt;/b&gt;"));
    }
}
