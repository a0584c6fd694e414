//! Display helpers: `MM:SS` formatting, duration presets and control affordances

use serde::{Deserialize, Serialize};

use super::TimerState;

/// Format seconds as zero-padded `MM:SS`. Minutes are not wrapped into hours.
pub fn format_mm_ss(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// A named duration offered for one-click arming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub seconds: u32,
}

pub const PRESETS: [Preset; 6] = [
    Preset { label: "1m", seconds: 60 },
    Preset { label: "5m", seconds: 300 },
    Preset { label: "10m", seconds: 600 },
    Preset { label: "15m", seconds: 900 },
    Preset { label: "30m", seconds: 1800 },
    Preset { label: "1h", seconds: 3600 },
];

/// Look up a preset by its label
pub fn preset(label: &str) -> Option<Preset> {
    PRESETS.iter().copied().find(|p| p.label == label)
}

/// Label for the combined start/pause action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryAction {
    Start,
    Pause,
    Resume,
}

/// Which controls a host should offer for a slot in its current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotControls {
    pub primary: PrimaryAction,
    pub primary_enabled: bool,
    pub reset_enabled: bool,
    pub presets_enabled: bool,
}

impl SlotControls {
    pub fn derive(state: TimerState, total_seconds: u32, remaining_seconds: u32) -> Self {
        let has_time = total_seconds > 0;
        let (primary, primary_enabled) = match state {
            TimerState::Idle | TimerState::Finished => (PrimaryAction::Start, has_time),
            TimerState::Running => (PrimaryAction::Pause, true),
            TimerState::Paused => (PrimaryAction::Resume, true),
        };

        Self {
            primary,
            primary_enabled,
            reset_enabled: state != TimerState::Idle || remaining_seconds != total_seconds,
            presets_enabled: !state.is_running(),
        }
    }
}
