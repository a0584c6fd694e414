//! Timer model module
//!
//! The per-timer state machine plus the value types hosts use to render it.

pub mod display;
pub mod timer_model;
pub mod timer_state;

// Re-export main types
pub use display::{format_mm_ss, preset, Preset, PrimaryAction, SlotControls, PRESETS};
pub use timer_model::{TimerListener, TimerStateMachine};
pub use timer_state::{TimerEvent, TimerState};
