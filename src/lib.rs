//! Multi Timer - up to a fixed number of countdown timers sharing one alert
//!
//! This library provides the per-timer state machine, the coordinator that
//! owns timer slots and their tick subscriptions, the shared alert channel,
//! and an HTTP control surface.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod model;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use coordinator::{SlotId, TimerCoordinator};
pub use error::CoordinatorError;
pub use model::{TimerState, TimerStateMachine};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
