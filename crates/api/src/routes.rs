use crate::session::SharedSession;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use realtor_core::controller::{begin_search, complete_search, AppState, Event, Phase, SearchOutcome};
use realtor_core::domain::criteria::SearchForm;
use realtor_core::view::{loading_page, report_page, search_page, DetailSelection};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub fn router(session: SharedSession) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/reset", post(reset))
        .route("/report.pdf", get(report_pdf))
        .route("/healthz", get(healthz))
        .with_state(session)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

fn internal_error(err: anyhow::Error) -> Response {
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = %format!("{err:#}"), "request failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    property: Option<usize>,
}

async fn index(State(session): State<SharedSession>, Query(query): Query<PageQuery>) -> Response {
    let page = {
        let controller = match session.controller() {
            Ok(c) => c,
            Err(e) => return internal_error(e),
        };
        match controller.state() {
            AppState::Idle { last_search } => {
                let form = last_search.as_ref().map(SearchForm::from).unwrap_or_default();
                search_page(&form, &session.take_alerts())
            }
            AppState::Loading { .. } => loading_page(session.loading_message()),
            AppState::Ready { criteria, report } => {
                let selection = query
                    .property
                    .map(DetailSelection::of)
                    .unwrap_or_else(DetailSelection::none);
                report_page(report, criteria, selection)
            }
        }
    };
    Html(page.into_string()).into_response()
}

async fn search(State(session): State<SharedSession>, Form(form): Form<SearchForm>) -> Response {
    match session.controller().map(|c| c.phase()) {
        Ok(Phase::Idle) => {}
        Ok(phase) => {
            tracing::warn!(?phase, "search submitted while not idle");
            return StatusCode::CONFLICT.into_response();
        }
        Err(e) => return internal_error(e),
    }

    let criteria = match begin_search(&session.controller, &form, session.as_ref()) {
        Ok(Ok(criteria)) => criteria,
        Ok(Err(_)) => {
            let page = search_page(&form, &session.take_alerts());
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page.into_string())).into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "search rejected by controller");
            return StatusCode::CONFLICT.into_response();
        }
    };

    session.start_ticker();
    let task_session = session.clone();
    tokio::spawn(async move {
        let result = task_session.client.request_report(&criteria).await;
        if let Err(e) = &result {
            sentry_anyhow::capture_anyhow(e);
        }
        let outcome = complete_search(&task_session.controller, result, task_session.as_ref());
        task_session.stop_ticker();
        match outcome {
            Ok(SearchOutcome::Ready(report)) => tracing::info!(
                location = %criteria.location,
                properties = report.properties.len(),
                sources = report.sources.len(),
                "market report ready"
            ),
            Ok(_) => {}
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "failed to record report result");
            }
        }
    });

    Redirect::to("/").into_response()
}

async fn reset(State(session): State<SharedSession>) -> Response {
    let mut controller = match session.controller() {
        Ok(c) => c,
        Err(e) => return internal_error(e),
    };
    match controller.dispatch(Event::Reset) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "reset rejected");
            StatusCode::CONFLICT.into_response()
        }
    }
}

async fn report_pdf(State(session): State<SharedSession>) -> Response {
    let snapshot = match session.controller() {
        Ok(c) => match c.state() {
            AppState::Ready { criteria, report } => Some((criteria.clone(), report.clone())),
            _ => None,
        },
        Err(e) => return internal_error(e),
    };
    let Some((criteria, report)) = snapshot else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let today = chrono::Local::now().date_naive();
    match realtor_core::export::export(&report, &criteria, today) {
        Ok(file) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.bytes,
        )
            .into_response(),
        Err(e) => internal_error(e),
    }
}
