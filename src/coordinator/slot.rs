//! Timer slots: one state machine plus its coordinator-owned tick subscription

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tick::{SubscriptionId, TickSubscription};
use crate::model::{SlotControls, TimerEvent, TimerState, TimerStateMachine};

/// Stable identifier of a slot within one coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A timer notification tagged with the slot that emitted it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotEvent {
    pub slot: SlotId,
    #[serde(flatten)]
    pub event: TimerEvent,
}

/// Point-in-time view of a slot for hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub id: SlotId,
    pub state: TimerState,
    pub total_seconds: u32,
    pub remaining_seconds: u32,
    pub display: String,
    pub live_subscription: bool,
    pub controls: SlotControls,
}

pub(crate) struct LiveSubscription {
    pub(crate) id: SubscriptionId,
    handle: Box<dyn TickSubscription>,
}

impl LiveSubscription {
    pub(crate) fn new(id: SubscriptionId, handle: Box<dyn TickSubscription>) -> Self {
        Self { id, handle }
    }
}

impl fmt::Debug for LiveSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LiveSubscription").field(&self.id).finish()
    }
}

#[derive(Debug)]
pub(crate) struct Slot {
    pub(crate) id: SlotId,
    pub(crate) machine: TimerStateMachine,
    pub(crate) subscription: Option<LiveSubscription>,
}

impl Slot {
    pub(crate) fn new(id: SlotId, machine: TimerStateMachine) -> Self {
        Self {
            id,
            machine,
            subscription: None,
        }
    }

    pub(crate) fn live_subscription(&self) -> Option<SubscriptionId> {
        self.subscription.as_ref().map(|s| s.id)
    }

    /// Cancel and forget the tick subscription, if any
    pub(crate) fn release_subscription(&mut self) {
        if let Some(mut live) = self.subscription.take() {
            live.handle.cancel();
            debug!("Released tick subscription {} for timer {}", live.id, self.id);
        }
    }

    pub(crate) fn snapshot(&self) -> SlotSnapshot {
        let state = self.machine.state();
        let total = self.machine.total_seconds();
        let remaining = self.machine.remaining_seconds();

        SlotSnapshot {
            id: self.id,
            state,
            total_seconds: total,
            remaining_seconds: remaining,
            display: self.machine.display_time(),
            live_subscription: self.subscription.is_some(),
            controls: SlotControls::derive(state, total, remaining),
        }
    }
}
