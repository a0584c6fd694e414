//! Tick dispatch background task

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::coordinator::{SharedCoordinator, Tick};

/// Background task that applies tick deliveries to the coordinator one at a time.
///
/// This is the single event loop every tick passes through, so a slot's
/// completion and its alert are fully handled before the next tick is looked at.
pub async fn tick_dispatch_task(
    coordinator: SharedCoordinator,
    mut ticks: mpsc::UnboundedReceiver<Tick>,
) {
    info!("Starting tick dispatch task");

    while let Some(tick) = ticks.recv().await {
        match coordinator.lock() {
            Ok(mut coordinator) => coordinator.on_tick(tick),
            Err(e) => {
                error!("Failed to lock coordinator for tick on timer {}: {}", tick.slot, e);
            }
        }
    }

    info!("Tick source closed, dispatch task exiting");
}
