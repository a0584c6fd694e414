//! External collaborator module
//!
//! This module contains the shared alert resource that timer slots signal
//! when they finish.

pub mod alert;

// Re-export main types
pub use alert::{AlertChannel, AlertConfig, CommandAlert, HapticPattern};
