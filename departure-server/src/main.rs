use std::error::Error;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use departure_server::config::AppConfig;
use departure_server::response::Formatter;
use departure_server::timetable::{FeedLoader, Timetable};
use departure_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // Without a feed directory the server still runs, answering "unavailable"
    let timetable = match &config.gtfs_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "loading timetable");
            Timetable::open(FeedLoader::new(dir)).await?
        }
        None => {
            warn!("GTFS_DIR not set; serving without schedule data");
            Timetable::unavailable()
        }
    };
    info!(
        stops = timetable.current().await.stop_count(),
        "timetable ready"
    );

    // Spawn background task to reload the feed periodically
    if let (Some(period), true) = (config.refresh_interval, timetable.is_reloadable()) {
        let refresh = timetable.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                match refresh.reload().await {
                    Ok(stops) => info!(stops, "refreshed timetable"),
                    Err(e) => warn!(error = %e, "failed to refresh timetable, keeping previous snapshot"),
                }
            }
        });
        info!(secs = period.as_secs(), "periodic timetable reload enabled");
    }

    let state = AppState::new(timetable, Formatter::new(&config.agency_name));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "departure server listening");
    println!("API Endpoints:");
    println!("  GET  /                 - Server information");
    println!("  GET  /health           - Health check");
    println!("  GET  /tools            - Tool catalogue");
    println!("  POST /departures/next  - Next departures");
    println!("  GET  /stops            - List stops");
    println!("  GET  /routes           - List routes");
    println!("  POST /admin/reload     - Reload timetable");

    axum::serve(listener, app).await?;
    Ok(())
}
