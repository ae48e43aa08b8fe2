// src/main.rs
//
// Wires the HTTP-backed controller to a JSON-lines session on stdin/stdout.
// Logs go to stderr so stdout carries only protocol lines.

use anyhow::Context;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use book_catalogue::application::{run_shell, AppState};
use book_catalogue::config::AppConfig;
use book_catalogue::events::{BookDeleted, BookSaved, EventBus, StaleResponseDiscarded};
use book_catalogue::repositories::{HttpRemoteBookService, RemoteBookService};
use book_catalogue::services::CatalogueViewController;
use book_catalogue::ViewMode;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // 1. CONFIGURATION
    let config = AppConfig::load().context("failed to load configuration")?;

    // 2. LOGGING
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("book_catalogue={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    log::info!("Starting book-catalogue v{}", env!("CARGO_PKG_VERSION"));
    log::info!("catalogue at {}", config.books_url());

    // 3. REMOTE SERVICE
    let service: Arc<dyn RemoteBookService> = Arc::new(
        HttpRemoteBookService::from_config(&config).context("failed to build HTTP clients")?,
    );

    // 4. CONTROLLER & EVENT WIRING
    let event_bus = Arc::new(EventBus::new());
    event_bus.subscribe::<BookSaved, _>(|event| {
        log::info!(
            "[{}] saved {} ({})",
            event.occurred_at.format("%H:%M:%S"),
            event.book_id,
            event.title
        );
    });
    event_bus.subscribe::<BookDeleted, _>(|event| {
        log::info!("[{}] deleted {}", event.occurred_at.format("%H:%M:%S"), event.book_id);
    });
    event_bus.subscribe::<StaleResponseDiscarded, _>(|event| {
        log::debug!(
            "stale {} response (generation {} < {})",
            event.request,
            event.issued_generation,
            event.current_generation
        );
    });

    let catalogue = Arc::new(CatalogueViewController::new(service, event_bus.clone()));
    let state = Arc::new(AppState {
        event_bus,
        catalogue,
    });

    // 5. INITIAL VIEW
    state.catalogue.navigate(ViewMode::List).await;

    // 6. SESSION
    let handled = run_shell(
        Arc::clone(&state),
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    log::info!("session finished after {} intents", handled);
    Ok(())
}
