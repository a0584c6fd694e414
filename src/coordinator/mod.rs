//! Multi-timer coordination module
//!
//! Slot bookkeeping, tick subscriptions and alert sequencing.

pub mod coordinator;
pub mod slot;
pub mod tick;

// Re-export main types
pub use coordinator::{SharedCoordinator, TimerCoordinator, DEFAULT_MAX_TIMERS};
pub use slot::{SlotEvent, SlotId, SlotSnapshot};
pub use tick::{IntervalTickSource, SubscriptionId, Tick, TickSource, TickSubscription, TICK_PERIOD};
