//! State management module
//!
//! Application-level state shared between the HTTP handlers and background tasks.

pub mod app_state;

// Re-export main types
pub use app_state::AppState;
