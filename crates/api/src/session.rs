use realtor_core::controller::{AppController, Notifier};
use realtor_core::llm::ReportClient;
use realtor_core::view::loading::LOADING_MESSAGES;
use realtor_core::view::LoadingTicker;
use std::sync::{Arc, Mutex, MutexGuard};

/// The single local browsing session. None of these locks is held across an
/// await.
pub struct Session {
    pub controller: Mutex<AppController>,
    pub client: Arc<dyn ReportClient>,
    alerts: Mutex<Vec<String>>,
    ticker: Mutex<Option<LoadingTicker>>,
}

pub type SharedSession = Arc<Session>;

impl Session {
    pub fn new(client: Arc<dyn ReportClient>) -> SharedSession {
        Arc::new(Self {
            controller: Mutex::new(AppController::new()),
            client,
            alerts: Mutex::new(Vec::new()),
            ticker: Mutex::new(None),
        })
    }

    pub fn controller(&self) -> anyhow::Result<MutexGuard<'_, AppController>> {
        self.controller
            .lock()
            .map_err(|_| anyhow::anyhow!("controller lock poisoned"))
    }

    /// Pending alerts, each returned exactly once.
    pub fn take_alerts(&self) -> Vec<String> {
        match self.alerts.lock() {
            Ok(mut alerts) => std::mem::take(&mut *alerts),
            Err(_) => Vec::new(),
        }
    }

    pub fn start_ticker(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            *ticker = Some(LoadingTicker::start());
        }
    }

    pub fn stop_ticker(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            ticker.take();
        }
    }

    pub fn loading_message(&self) -> &'static str {
        self.ticker
            .lock()
            .ok()
            .and_then(|t| t.as_ref().map(LoadingTicker::current_message))
            .unwrap_or(LOADING_MESSAGES[0])
    }
}

impl Notifier for Session {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}
