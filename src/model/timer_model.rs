//! Single countdown timer state machine
//!
//! The machine knows nothing about wall-clock scheduling or other timers.
//! An external tick source calls [`TimerStateMachine::advance_one_tick`] once per
//! second while the timer is running; everything else is a user command.
//! Illegal commands are no-ops, reported through a `false` return value.

use std::fmt;

use super::{display::format_mm_ss, TimerEvent, TimerState};

/// Callback invoked synchronously for each emitted notification
pub type TimerListener = Box<dyn FnMut(&TimerEvent) + Send>;

/// One timer's duration, remaining time and lifecycle state
pub struct TimerStateMachine {
    total_seconds: u32,
    remaining_seconds: u32,
    state: TimerState,
    listeners: Vec<TimerListener>,
}

impl TimerStateMachine {
    /// Create an idle timer with no duration
    pub fn new() -> Self {
        Self {
            total_seconds: 0,
            remaining_seconds: 0,
            state: TimerState::Idle,
            listeners: Vec::new(),
        }
    }

    /// Register a listener; listeners are notified in registration order
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&TimerEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Remaining time as `MM:SS`
    pub fn display_time(&self) -> String {
        format_mm_ss(self.remaining_seconds)
    }

    /// Arm the timer with a new duration.
    ///
    /// Ignored while running. Otherwise the timer returns to `Idle` with
    /// `remaining == total == seconds`.
    pub fn set_duration(&mut self, seconds: u32) -> bool {
        if self.state.is_running() {
            return false;
        }

        self.total_seconds = seconds;
        self.remaining_seconds = seconds;

        let mut events = vec![TimerEvent::Tick { remaining_seconds: seconds }];
        self.transition(TimerState::Idle, &mut events);
        self.emit(&events);
        true
    }

    /// Begin or resume counting down.
    ///
    /// No-op with nothing left to run, or from any state but `Idle`/`Paused`.
    pub fn start(&mut self) -> bool {
        if self.remaining_seconds == 0 || !self.state.can_start() {
            return false;
        }

        let mut events = Vec::with_capacity(1);
        self.transition(TimerState::Running, &mut events);
        self.emit(&events);
        true
    }

    /// Suspend a running countdown
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        let mut events = Vec::with_capacity(1);
        self.transition(TimerState::Paused, &mut events);
        self.emit(&events);
        true
    }

    /// Return to `Idle` with the full duration; always republishes the remaining time
    pub fn reset(&mut self) {
        self.remaining_seconds = self.total_seconds;

        let mut events = vec![TimerEvent::Tick {
            remaining_seconds: self.remaining_seconds,
        }];
        self.transition(TimerState::Idle, &mut events);
        self.emit(&events);
    }

    /// Consume one second of a running countdown.
    ///
    /// Returns whether the caller should keep ticking. Called while not running
    /// it mutates nothing and returns `false`.
    pub fn advance_one_tick(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        // Running always implies remaining > 0: start refuses an empty timer
        // and the 1 -> 0 edge leaves Running.
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);

        let mut events = vec![TimerEvent::Tick {
            remaining_seconds: self.remaining_seconds,
        }];

        let keep_ticking = self.remaining_seconds > 0;
        if !keep_ticking {
            self.transition(TimerState::Finished, &mut events);
            events.push(TimerEvent::Completed);
        }

        self.emit(&events);
        keep_ticking
    }

    fn transition(&mut self, next: TimerState, events: &mut Vec<TimerEvent>) {
        if self.state != next {
            self.state = next;
            events.push(TimerEvent::StateChanged { state: next });
        }
    }

    fn emit(&mut self, events: &[TimerEvent]) {
        for event in events {
            for listener in self.listeners.iter_mut() {
                listener(event);
            }
        }
    }
}

impl Default for TimerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerStateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerStateMachine")
            .field("total_seconds", &self.total_seconds)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
