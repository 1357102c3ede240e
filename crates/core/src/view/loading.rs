use super::layout::layout;
use maud::{html, Markup};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const LOADING_MESSAGES: [&str; 7] = [
    "Aggregating latest DFW sales data...",
    "Pulling school district ratings...",
    "Calculating neighborhood appreciation rates...",
    "Scanning current MLS listings...",
    "Estimating potential rental cash flow...",
    "Analyzing local commute heatmaps...",
    "Generating your professional market report...",
];

pub const MESSAGE_PERIOD: Duration = Duration::from_millis(2500);

/// Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct LoadingTicker {
    index: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl LoadingTicker {
    pub fn start() -> Self {
        Self::with_period(MESSAGE_PERIOD)
    }

    pub fn with_period(period: Duration) -> Self {
        let (tx, rx) = watch::channel(0usize);
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                tx.send_modify(|i| *i = (*i + 1) % LOADING_MESSAGES.len());
            }
        });
        Self { index: rx, task }
    }

    pub fn current_message(&self) -> &'static str {
        LOADING_MESSAGES[*self.index.borrow()]
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.clone()
    }
}

impl Drop for LoadingTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn loading_overlay(message: &str) -> Markup {
    html! {
        div id="loading-overlay" class="fixed inset-0 z-[100] flex items-center justify-center bg-slate-50/90 backdrop-blur-md" {
            div class="text-center max-w-sm px-4" {
                div class="relative inline-block mb-8" {
                    div class="w-20 h-20 border-4 border-blue-600/20 border-t-blue-600 rounded-full animate-spin" {}
                    div class="absolute inset-0 flex items-center justify-center" {
                        i class="fas fa-city text-blue-600 text-xl animate-pulse" {}
                    }
                }
                h2 class="text-2xl font-black text-slate-900 mb-2" { "Analyzing the Market" }
                p class="loading-message text-slate-500 font-medium h-12 flex items-center justify-center" { (message) }
            }
        }
    }
}

/// Page shown while a report request is in flight. It polls so the browser
/// picks up the result and the next status message.
pub fn loading_page(message: &str) -> Markup {
    layout("Analyzing the Market", Some(2), loading_overlay(message))
}
