use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::Semaphore;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use mpk_departures::config::AppConfig;
use mpk_departures::feed::{ErrorReporter, FeedClient};
use mpk_departures::sensors::setup_all;
use mpk_departures::stops::fetch_snapshot;
use mpk_departures::web::{AppState, create_router};

/// Configuration file used when `MPK_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "mpk.json";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("MPK_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&config_path).unwrap_or_else(|e| {
        error!(error = %e, "Failed to load configuration");
        std::process::exit(1);
    });

    // The feed client is blocking, so it is created and used for setup
    // before any async runtime exists.
    let reporter = Arc::new(ErrorReporter::new(config.error_cooldown()));
    let client = Arc::new(
        FeedClient::new(config.feed_config(), reporter).expect("Failed to create feed client"),
    );

    info!(stops = config.stops.len(), "Setting up stops...");
    let stops = setup_all(&client, &config);
    if stops.is_empty() {
        warn!("No stop could be set up; serving an empty sensor list");
    } else {
        info!(stops = stops.len(), "Stops ready");
    }

    let state = AppState::new(&config.name, stops);

    let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
    runtime.block_on(serve(config, Arc::clone(&client), state));

    // Shut the runtime down before the last client handle goes away.
    drop(runtime);
}

async fn serve(config: AppConfig, client: Arc<FeedClient>, state: AppState) {
    let limiter = Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1)));

    let stop_count = state.stops.read().await.len();
    for slot in 0..stop_count {
        tokio::spawn(refresh_loop(
            slot,
            config.scan_interval(),
            Arc::clone(&client),
            Arc::clone(&limiter),
            state.clone(),
        ));
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .expect("Failed to bind listen address");
    info!("{} listening on http://{}", config.name, config.listen);
    info!("API Endpoints:");
    info!("  GET  /health            - Health check");
    info!("  GET  /stops             - Configured stops");
    info!("  GET  /sensors           - All departure sensors");
    info!("  GET  /sensors/:id       - One departure sensor");

    axum::serve(listener, app).await.expect("Server failed");
}

/// Refresh one stop forever, one fetch per tick.
///
/// Setup already fetched once, so the first refresh waits a full period.
async fn refresh_loop(
    slot: usize,
    period: Duration,
    client: Arc<FeedClient>,
    limiter: Arc<Semaphore>,
    state: AppState,
) {
    let query = *state.stops.read().await[slot].query();

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // First tick is immediate, skip it

    loop {
        interval.tick().await;

        let Ok(_permit) = limiter.acquire().await else {
            return;
        };

        let client = Arc::clone(&client);
        let snapshot =
            match tokio::task::spawn_blocking(move || fetch_snapshot(&client, &query)).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!(%query, error = %e, "Refresh task failed");
                    None
                }
            };

        let available = state.stops.write().await[slot].apply(snapshot, Local::now());
        debug!(%query, available, "Stop refreshed");
    }
}
