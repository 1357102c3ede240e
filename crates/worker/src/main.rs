use anyhow::Context;
use clap::Parser;
use realtor_core::controller::{submit_search, AppController, Notifier, SearchOutcome};
use realtor_core::domain::criteria::{PropertyType, Purpose, SearchForm};
use realtor_core::llm::fixture::FixtureClient;
use realtor_core::llm::gemini::GeminiClient;
use realtor_core::llm::ReportClient;
use realtor_core::view::loading::LOADING_MESSAGES;
use realtor_core::view::{report_page, DetailSelection, LoadingTicker};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "realtor_worker")]
struct Args {
    /// Zip code, neighborhood, or landmark.
    #[arg(long)]
    location: String,

    /// Contact email printed on the PDF.
    #[arg(long)]
    email: String,

    #[arg(long, default_value = "single-family")]
    property_type: PropertyType,

    #[arg(long, default_value = "buy")]
    purpose: Purpose,

    #[arg(long, default_value = "")]
    budget: String,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Replay a recorded report body instead of calling Gemini.
    #[arg(long)]
    fixture: Option<PathBuf>,
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        tracing::warn!(alert = message, "user alert");
        eprintln!("{message}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = realtor_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let client: Box<dyn ReportClient> = match &args.fixture {
        Some(path) => Box::new(FixtureClient::from_path(path)?),
        None => Box::new(GeminiClient::from_settings(&settings)?),
    };

    let form = SearchForm {
        location: args.location.clone(),
        property_type: args.property_type,
        budget: args.budget.clone(),
        purpose: args.purpose,
        contact_email: args.email.clone(),
    };

    let controller = Mutex::new(AppController::new());
    let notifier = ConsoleNotifier;

    let ticker = LoadingTicker::start();
    let mut updates = ticker.subscribe();
    let search = submit_search(&controller, &form, client.as_ref(), &notifier);
    tokio::pin!(search);
    let outcome = loop {
        tokio::select! {
            outcome = &mut search => break outcome?,
            Ok(()) = updates.changed() => {
                let index = *updates.borrow_and_update();
                eprintln!("{}", LOADING_MESSAGES[index]);
            }
        }
    };
    drop(ticker);

    let report = match outcome {
        SearchOutcome::Ready(report) => report,
        SearchOutcome::Rejected(e) => return Err(e.into()),
        SearchOutcome::Failed(err) => {
            sentry_anyhow::capture_anyhow(&err);
            return Err(err);
        }
    };

    let criteria = controller
        .lock()
        .map_err(|_| anyhow::anyhow!("controller lock poisoned"))?
        .last_search()
        .cloned()
        .context("report ready without search criteria")?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let today = chrono::Local::now().date_naive();
    let file = realtor_core::export::export(&report, &criteria, today)?;
    let pdf_path = args.out_dir.join(&file.filename);
    std::fs::write(&pdf_path, &file.bytes)
        .with_context(|| format!("failed to write {}", pdf_path.display()))?;

    let html_path = pdf_path.with_extension("html");
    let html = report_page(&report, &criteria, DetailSelection::none()).into_string();
    std::fs::write(&html_path, html)
        .with_context(|| format!("failed to write {}", html_path.display()))?;

    tracing::info!(
        location = %criteria.location,
        provider = ?client.provider(),
        properties = report.properties.len(),
        sources = report.sources.len(),
        pdf = %pdf_path.display(),
        html = %html_path.display(),
        "market report written"
    );
    println!("{}", pdf_path.display());
    println!("{}", html_path.display());

    Ok(())
}

fn init_sentry(settings: &realtor_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_default_to_single_family_purchase() {
        let args =
            Args::try_parse_from(["realtor_worker", "--location", "Frisco", "--email", "a@b.co"])
                .unwrap();
        assert_eq!(args.property_type, PropertyType::SingleFamily);
        assert_eq!(args.purpose, Purpose::Buy);
        assert_eq!(args.budget, "");
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert!(args.fixture.is_none());
    }

    #[test]
    fn args_accept_cli_names_and_labels() {
        let args = Args::try_parse_from([
            "realtor_worker",
            "--location",
            "75201",
            "--email",
            "a@b.co",
            "--property-type",
            "multi-family",
            "--purpose",
            "invest",
            "--fixture",
            "fixtures/deep_ellum_report.json",
        ])
        .unwrap();
        assert_eq!(args.property_type, PropertyType::MultiFamily);
        assert_eq!(args.purpose, Purpose::Invest);
        assert_eq!(args.fixture, Some(PathBuf::from("fixtures/deep_ellum_report.json")));
    }

    #[test]
    fn args_require_location_and_email() {
        assert!(Args::try_parse_from(["realtor_worker", "--location", "Plano"]).is_err());
    }
}
