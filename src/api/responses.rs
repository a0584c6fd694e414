//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::coordinator::SlotSnapshot;

/// Response for commands addressed to one timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: SlotSnapshot,
}

impl CommandResponse {
    pub fn new(status: &str, message: String, timer: SlotSnapshot) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// The command changed the timer
    pub fn applied(message: String, timer: SlotSnapshot) -> Self {
        Self::new("applied", message, timer)
    }

    /// The command was not valid in the timer's state and did nothing
    pub fn unchanged(message: String, timer: SlotSnapshot) -> Self {
        Self::new("unchanged", message, timer)
    }

    pub fn from_outcome(applied: bool, message: String, timer: SlotSnapshot) -> Self {
        if applied {
            Self::applied(message, timer)
        } else {
            Self::unchanged(message, timer)
        }
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Request body for setting a duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationRequest {
    pub seconds: u32,
}

/// Session status with every timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: Vec<SlotSnapshot>,
    pub max_timers: usize,
    pub can_add_timer: bool,
    pub live_subscriptions: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
