//! Shared application state for the HTTP layer

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::coordinator::{SharedCoordinator, TimerCoordinator};

/// State shared by all request handlers
#[derive(Debug)]
pub struct AppState {
    /// The timer coordinator, also driven by the tick dispatcher
    pub coordinator: SharedCoordinator,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last command tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(coordinator: SharedCoordinator, port: u16, host: String) -> Self {
        Self {
            coordinator,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run a read-only query against the coordinator
    pub fn inspect<R, F>(&self, query: F) -> Result<R, String>
    where
        F: FnOnce(&TimerCoordinator) -> R,
    {
        let coordinator = self
            .coordinator
            .lock()
            .map_err(|e| format!("Failed to lock coordinator: {}", e))?;
        Ok(query(&coordinator))
    }

    /// Run a command against the coordinator and record it as the last action
    pub fn command<R, F>(&self, action: &str, command: F) -> Result<R, String>
    where
        F: FnOnce(&mut TimerCoordinator) -> R,
    {
        let mut coordinator = self
            .coordinator
            .lock()
            .map_err(|e| format!("Failed to lock coordinator: {}", e))?;
        let result = command(&mut coordinator);
        drop(coordinator); // Release the lock early

        debug!("Command applied: {}", action);
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last command information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
