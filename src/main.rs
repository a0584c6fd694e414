//! Multi Timer - countdown timers with a shared alert
//!
//! This is the main entry point for the multi-timer application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use multi_timer::{
    api::create_router,
    config::Config,
    coordinator::{IntervalTickSource, TimerCoordinator, TICK_PERIOD},
    services::{AlertChannel, CommandAlert},
    state::AppState,
    tasks::tick_dispatch_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("multi_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting multi-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, max_timers={}, alert_sound={:?}",
        config.host, config.port, config.max_timers, config.alert_sound
    );

    // Shared alert and the tick source feeding the dispatcher
    let alert: Arc<dyn AlertChannel> = Arc::new(CommandAlert::new(config.alert_config()));
    let (tick_source, ticks) = IntervalTickSource::new(TICK_PERIOD);

    let mut coordinator =
        TimerCoordinator::new(usize::from(config.max_timers), alert, Arc::new(tick_source));
    for _ in 0..config.startup_timers() {
        coordinator.add_slot()?;
    }
    let coordinator = coordinator.into_shared();

    // Start the tick dispatch background task
    tokio::spawn(tick_dispatch_task(Arc::clone(&coordinator), ticks));

    let state = Arc::new(AppState::new(Arc::clone(&coordinator), config.port, config.host.clone()));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                    - List timers");
    info!("  POST   /timers                    - Add a timer");
    info!("  DELETE /timers/:id                - Remove a timer");
    info!("  POST   /timers/:id/duration       - Set duration {{\"seconds\": n}}");
    info!("  POST   /timers/:id/preset/:label  - Apply a preset");
    info!("  POST   /timers/:id/start|pause|reset|toggle");
    info!("  GET    /presets                   - List presets");
    info!("  GET    /status                    - Session status");
    info!("  GET    /health                    - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    match coordinator.lock() {
        Ok(mut coordinator) => coordinator.shutdown(),
        Err(e) => error!("Failed to lock coordinator for shutdown: {}", e),
    }

    info!("Server shutdown complete");
    Ok(())
}
