//! Timer lifecycle state and the notifications a timer emits

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of a single countdown timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Armed (or never set) and not counting
    #[default]
    Idle,
    /// Counting down, one tick per second
    Running,
    /// Countdown suspended, remaining time kept
    Paused,
    /// Reached zero; only reset (or a coordinator restart) leaves this state
    Finished,
}

impl TimerState {
    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }

    /// States from which `start` is accepted
    pub fn can_start(&self) -> bool {
        matches!(self, TimerState::Idle | TimerState::Paused)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
            TimerState::Finished => "finished",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notification emitted by a timer.
///
/// When one operation emits several, they are delivered in the order
/// `Tick`, `StateChanged`, `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Remaining time was (re)published
    Tick { remaining_seconds: u32 },
    /// The lifecycle state actually changed
    StateChanged { state: TimerState },
    /// The Running -> Finished edge was crossed
    Completed,
}
