use crate::domain::criteria::{SearchCriteria, SearchForm, ValidationError};
use crate::domain::report::MarketReport;
use crate::llm::ReportClient;
use anyhow::{anyhow, bail};
use std::sync::{Arc, Mutex, MutexGuard};

pub const REQUEST_FAILED_ALERT: &str = "Failed to generate market report. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// `last_search` survives a failed request so the form can be pre-filled.
    Idle { last_search: Option<SearchCriteria> },
    Loading { criteria: SearchCriteria },
    Ready {
        criteria: SearchCriteria,
        report: Arc<MarketReport>,
    },
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Idle { last_search: None }
    }
}

impl AppState {
    pub fn phase(&self) -> Phase {
        match self {
            AppState::Idle { .. } => Phase::Idle,
            AppState::Loading { .. } => Phase::Loading,
            AppState::Ready { .. } => Phase::Ready,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Event {
    Submit(SearchCriteria),
    Succeeded(MarketReport),
    Failed,
    Reset,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Submit(_) => "submit",
            Event::Succeeded(_) => "succeeded",
            Event::Failed => "failed",
            Event::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestReport(SearchCriteria),
    Alert(String),
}

#[derive(Debug, Default)]
pub struct AppController {
    state: AppState,
}

impl AppController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn report(&self) -> Option<&Arc<MarketReport>> {
        match &self.state {
            AppState::Ready { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn last_search(&self) -> Option<&SearchCriteria> {
        match &self.state {
            AppState::Idle { last_search } => last_search.as_ref(),
            AppState::Loading { criteria } | AppState::Ready { criteria, .. } => Some(criteria),
        }
    }

    /// Applies one event. Events that make no sense in the current phase are
    /// rejected and leave the state untouched.
    pub fn dispatch(&mut self, event: Event) -> anyhow::Result<Option<Effect>> {
        let from = self.state.phase();
        let current = std::mem::take(&mut self.state);
        let (next, effect) = match (current, event) {
            (AppState::Idle { .. }, Event::Submit(criteria)) => (
                AppState::Loading {
                    criteria: criteria.clone(),
                },
                Some(Effect::RequestReport(criteria)),
            ),
            (AppState::Loading { criteria }, Event::Succeeded(report)) => (
                AppState::Ready {
                    criteria,
                    report: Arc::new(report),
                },
                None,
            ),
            (AppState::Loading { criteria }, Event::Failed) => (
                AppState::Idle {
                    last_search: Some(criteria),
                },
                Some(Effect::Alert(REQUEST_FAILED_ALERT.to_string())),
            ),
            (AppState::Idle { .. } | AppState::Ready { .. }, Event::Reset) => {
                (AppState::Idle { last_search: None }, None)
            }
            (state, event) => {
                let phase = state.phase();
                self.state = state;
                bail!("{} is not valid while {:?}", event.name(), phase);
            }
        };

        tracing::debug!(?from, to = ?next.phase(), "controller transition");
        self.state = next;
        Ok(effect)
    }
}

pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

#[derive(Debug)]
pub enum SearchOutcome {
    Rejected(ValidationError),
    Ready(Arc<MarketReport>),
    Failed(anyhow::Error),
}

fn lock(controller: &Mutex<AppController>) -> anyhow::Result<MutexGuard<'_, AppController>> {
    controller
        .lock()
        .map_err(|_| anyhow!("controller lock poisoned"))
}

/// Validates the form and moves the controller to `Loading`. The inner
/// `Err` means validation failed and the user was already alerted.
pub fn begin_search(
    controller: &Mutex<AppController>,
    form: &SearchForm,
    notifier: &dyn Notifier,
) -> anyhow::Result<Result<SearchCriteria, ValidationError>> {
    let criteria = match form.submit() {
        Ok(criteria) => criteria,
        Err(e) => {
            notifier.alert(&e.to_string());
            return Ok(Err(e));
        }
    };

    match lock(controller)?.dispatch(Event::Submit(criteria))? {
        Some(Effect::RequestReport(criteria)) => Ok(Ok(criteria)),
        other => bail!("unexpected effect for submit: {other:?}"),
    }
}

pub fn complete_search(
    controller: &Mutex<AppController>,
    result: anyhow::Result<MarketReport>,
    notifier: &dyn Notifier,
) -> anyhow::Result<SearchOutcome> {
    match result {
        Ok(report) => {
            let mut guard = lock(controller)?;
            guard.dispatch(Event::Succeeded(report))?;
            let report = guard
                .report()
                .cloned()
                .ok_or_else(|| anyhow!("controller not ready after success"))?;
            Ok(SearchOutcome::Ready(report))
        }
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "market report request failed");
            let effect = lock(controller)?.dispatch(Event::Failed)?;
            if let Some(Effect::Alert(message)) = effect {
                notifier.alert(&message);
            }
            Ok(SearchOutcome::Failed(err))
        }
    }
}

/// Form → client → controller, end to end. The controller lock is never
/// held while the request is in flight.
pub async fn submit_search(
    controller: &Mutex<AppController>,
    form: &SearchForm,
    client: &dyn ReportClient,
    notifier: &dyn Notifier,
) -> anyhow::Result<SearchOutcome> {
    let criteria = match begin_search(controller, form, notifier)? {
        Ok(criteria) => criteria,
        Err(e) => return Ok(SearchOutcome::Rejected(e)),
    };
    let result = client.request_report(&criteria).await;
    complete_search(controller, result, notifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use crate::test_support::{sample_criteria, sample_report};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubClient {
        calls: AtomicUsize,
        seen: Mutex<Vec<SearchCriteria>>,
        fail: bool,
    }

    impl StubClient {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl ReportClient for StubClient {
        fn provider(&self) -> Provider {
            Provider::Fixture
        }

        async fn request_report(&self, criteria: &SearchCriteria) -> anyhow::Result<MarketReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(criteria.clone());
            if self.fail {
                bail!("connection reset");
            }
            Ok(sample_report(15))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    fn form_for(criteria: &SearchCriteria) -> SearchForm {
        SearchForm::from(criteria)
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_client() {
        let controller = Mutex::new(AppController::new());
        let client = StubClient::new(false);
        let notifier = RecordingNotifier::default();
        let form = SearchForm {
            location: "75201".to_string(),
            ..SearchForm::default()
        };

        let outcome = submit_search(&controller, &form, &client, &notifier).await.unwrap();

        assert!(matches!(outcome, SearchOutcome::Rejected(ValidationError::MissingRequired)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.lock().unwrap().phase(), Phase::Idle);
        assert_eq!(notifier.alerts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn valid_form_requests_once_and_stores_report() {
        let controller = Mutex::new(AppController::new());
        let client = StubClient::new(false);
        let notifier = RecordingNotifier::default();
        let criteria = sample_criteria();

        let outcome = submit_search(&controller, &form_for(&criteria), &client, &notifier)
            .await
            .unwrap();

        let SearchOutcome::Ready(report) = outcome else {
            panic!("expected ready outcome");
        };
        assert_eq!(*report, sample_report(15));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.seen.lock().unwrap().as_slice(), &[criteria.clone()]);
        let guard = controller.lock().unwrap();
        assert_eq!(guard.phase(), Phase::Ready);
        assert_eq!(guard.last_search(), Some(&criteria));
        assert!(notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_request_alerts_once_and_returns_to_idle() {
        let controller = Mutex::new(AppController::new());
        let client = StubClient::new(true);
        let notifier = RecordingNotifier::default();
        let criteria = sample_criteria();

        let outcome = submit_search(&controller, &form_for(&criteria), &client, &notifier)
            .await
            .unwrap();

        assert!(matches!(outcome, SearchOutcome::Failed(_)));
        assert_eq!(
            notifier.alerts.lock().unwrap().as_slice(),
            &[REQUEST_FAILED_ALERT.to_string()]
        );
        let guard = controller.lock().unwrap();
        assert_eq!(guard.phase(), Phase::Idle);
        assert!(guard.report().is_none());
        assert_eq!(guard.last_search(), Some(&criteria));
    }

    #[test]
    fn submit_transitions_idle_to_loading_exactly_once() {
        let mut controller = AppController::new();
        let effect = controller.dispatch(Event::Submit(sample_criteria())).unwrap();
        assert_eq!(effect, Some(Effect::RequestReport(sample_criteria())));
        assert_eq!(controller.phase(), Phase::Loading);

        assert!(controller.dispatch(Event::Submit(sample_criteria())).is_err());
        assert_eq!(controller.phase(), Phase::Loading);
    }

    #[test]
    fn reset_is_rejected_while_loading() {
        let mut controller = AppController::new();
        controller.dispatch(Event::Submit(sample_criteria())).unwrap();
        assert!(controller.dispatch(Event::Reset).is_err());
        assert_eq!(controller.phase(), Phase::Loading);
    }

    #[test]
    fn reset_from_ready_clears_report_and_criteria() {
        for count in [0, 3, 15] {
            let mut controller = AppController::new();
            controller.dispatch(Event::Submit(sample_criteria())).unwrap();
            let mut report = sample_report(15);
            report.properties.truncate(count);
            controller.dispatch(Event::Succeeded(report)).unwrap();
            assert_eq!(controller.phase(), Phase::Ready);

            assert_eq!(controller.dispatch(Event::Reset).unwrap(), None);
            assert_eq!(controller.state(), &AppState::Idle { last_search: None });
        }
    }

    #[test]
    fn results_require_a_request_in_flight() {
        let mut controller = AppController::new();
        assert!(controller.dispatch(Event::Succeeded(sample_report(15))).is_err());
        assert!(controller.dispatch(Event::Failed).is_err());
        assert_eq!(controller.phase(), Phase::Idle);
    }
}
