//! Multi-timer coordinator
//!
//! Owns a bounded, ordered set of timer slots. For every running slot it holds
//! exactly one tick subscription, and it is the only component that talks to
//! the shared [`AlertChannel`].

use std::{
    fmt,
    sync::{Arc, Mutex},
};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{
    slot::{LiveSubscription, Slot, SlotEvent, SlotId, SlotSnapshot},
    tick::{SubscriptionId, Tick, TickSource},
};
use crate::{
    error::CoordinatorError,
    model::{TimerState, TimerStateMachine},
    services::AlertChannel,
};

/// Default number of concurrent timers
pub const DEFAULT_MAX_TIMERS: usize = 3;

/// Coordinator shared between the tick dispatcher and command handlers
pub type SharedCoordinator = Arc<Mutex<TimerCoordinator>>;

pub struct TimerCoordinator {
    slots: Vec<Slot>,
    max_timers: usize,
    next_slot_id: u32,
    next_subscription_id: u64,
    alert: Arc<dyn AlertChannel>,
    ticks: Arc<dyn TickSource>,
    events_tx: broadcast::Sender<SlotEvent>,
}

impl TimerCoordinator {
    pub fn new(
        max_timers: usize,
        alert: Arc<dyn AlertChannel>,
        ticks: Arc<dyn TickSource>,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(100);

        Self {
            slots: Vec::with_capacity(max_timers),
            max_timers,
            next_slot_id: 1,
            next_subscription_id: 1,
            alert,
            ticks,
            events_tx,
        }
    }

    /// Wrap into the handle shared with the tick dispatcher
    pub fn into_shared(self) -> SharedCoordinator {
        Arc::new(Mutex::new(self))
    }

    /// Receive every timer notification, tagged with its slot
    pub fn subscribe_events(&self) -> broadcast::Receiver<SlotEvent> {
        self.events_tx.subscribe()
    }

    pub fn max_timers(&self) -> usize {
        self.max_timers
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn can_add_slot(&self) -> bool {
        self.slots.len() < self.max_timers
    }

    /// Number of slots currently holding a tick subscription
    pub fn live_subscriptions(&self) -> usize {
        self.slots.iter().filter(|s| s.subscription.is_some()).count()
    }

    /// Snapshots of all slots in creation order
    pub fn snapshot(&self) -> Vec<SlotSnapshot> {
        self.slots.iter().map(Slot::snapshot).collect()
    }

    pub fn slot_snapshot(&self, id: SlotId) -> Result<SlotSnapshot, CoordinatorError> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .map(Slot::snapshot)
            .ok_or(CoordinatorError::UnknownSlot(id))
    }

    /// Append a new idle timer, unless the coordinator is full
    pub fn add_slot(&mut self) -> Result<SlotId, CoordinatorError> {
        if !self.can_add_slot() {
            warn!("Refusing to add timer: already at capacity of {}", self.max_timers);
            return Err(CoordinatorError::CapacityExceeded {
                max: self.max_timers,
            });
        }

        let id = SlotId(self.next_slot_id);
        self.next_slot_id += 1;

        let mut machine = TimerStateMachine::new();
        let events_tx = self.events_tx.clone();
        machine.subscribe(move |event| {
            // No receivers is fine; nobody is watching
            let _ = events_tx.send(SlotEvent { slot: id, event: *event });
        });

        self.slots.push(Slot::new(id, machine));
        info!("Added timer {} ({}/{})", id, self.slots.len(), self.max_timers);
        Ok(id)
    }

    /// Drop a slot, releasing its tick subscription
    pub fn remove_slot(&mut self, id: SlotId) -> Result<(), CoordinatorError> {
        let index = self.index_of(id)?;
        let mut slot = self.slots.remove(index);
        slot.release_subscription();
        info!("Removed timer {}", id);
        Ok(())
    }

    /// Arm a slot with a new duration. Silences the alert first; ignored while running.
    pub fn request_set_duration(
        &mut self,
        id: SlotId,
        seconds: u32,
    ) -> Result<bool, CoordinatorError> {
        let index = self.index_of(id)?;
        if self.slots[index].machine.state().is_running() {
            debug!("Ignoring duration change for running timer {}", id);
            return Ok(false);
        }

        self.alert.stop_alert();
        let applied = self.slots[index].machine.set_duration(seconds);
        info!("Timer {} set to {}s", id, seconds);
        Ok(applied)
    }

    /// Start or resume a slot. A finished slot is silenced, reset and restarted.
    pub fn request_start(&mut self, id: SlotId) -> Result<bool, CoordinatorError> {
        let index = self.index_of(id)?;

        if self.slots[index].machine.state() == TimerState::Finished {
            debug!("Timer {} restarting from finished", id);
            self.alert.stop_alert();
            self.slots[index].machine.reset();
        }

        let started = self.slots[index].machine.start();
        if started {
            self.ensure_subscription(index);
            info!(
                "Timer {} running with {}s remaining",
                id,
                self.slots[index].machine.remaining_seconds()
            );
        } else {
            debug!(
                "Start ignored for timer {} in state {}",
                id,
                self.slots[index].machine.state()
            );
        }

        Ok(started)
    }

    /// Pause a running slot and stop its ticks
    pub fn request_pause(&mut self, id: SlotId) -> Result<bool, CoordinatorError> {
        let slot = self.slot_mut(id)?;

        let paused = slot.machine.pause();
        if paused {
            slot.release_subscription();
            info!("Timer {} paused at {}", id, slot.machine.display_time());
        } else {
            debug!("Pause ignored for timer {} in state {}", id, slot.machine.state());
        }

        Ok(paused)
    }

    /// Silence the alert, stop ticks and return the slot to its full duration
    pub fn request_reset(&mut self, id: SlotId) -> Result<(), CoordinatorError> {
        let index = self.index_of(id)?;

        self.alert.stop_alert();
        let slot = &mut self.slots[index];
        slot.release_subscription();
        slot.machine.reset();
        info!("Timer {} reset to {}", id, slot.machine.display_time());
        Ok(())
    }

    /// The combined start/pause control: pause when running, start otherwise
    pub fn request_toggle(&mut self, id: SlotId) -> Result<bool, CoordinatorError> {
        let running = self.slot_mut(id)?.machine.state().is_running();
        if running {
            self.request_pause(id)
        } else {
            self.request_start(id)
        }
    }

    /// Apply one tick delivery.
    ///
    /// Ticks from a subscription that is no longer live are discarded. When the
    /// slot stops ticking its subscription is released; when it finished, the
    /// alert is played before this returns.
    pub fn on_tick(&mut self, tick: Tick) {
        let Some(slot) = self.slots.iter_mut().find(|s| s.id == tick.slot) else {
            debug!("Dropping tick for removed timer {}", tick.slot);
            return;
        };

        if slot.live_subscription() != Some(tick.subscription) {
            debug!(
                "Dropping stale tick {} for timer {}",
                tick.subscription, tick.slot
            );
            return;
        }

        if slot.machine.advance_one_tick() {
            return;
        }

        slot.release_subscription();
        if slot.machine.state() == TimerState::Finished {
            info!("Timer {} finished, playing alert", slot.id);
            self.alert.play_alert();
        }
    }

    /// Release every subscription and silence the alert
    pub fn shutdown(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.release_subscription();
        }
        self.alert.stop_alert();
        info!("Coordinator shut down, {} timers released", self.slots.len());
    }

    fn ensure_subscription(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        if slot.subscription.is_some() {
            debug!("Timer {} already has a live tick subscription", slot.id);
            return;
        }

        let id = SubscriptionId(self.next_subscription_id);
        self.next_subscription_id += 1;

        let handle = self.ticks.subscribe(Tick {
            slot: slot.id,
            subscription: id,
        });
        slot.subscription = Some(LiveSubscription::new(id, handle));
        debug!("Timer {} subscribed to ticks as {}", slot.id, id);
    }

    fn index_of(&self, id: SlotId) -> Result<usize, CoordinatorError> {
        self.slots
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoordinatorError::UnknownSlot(id))
    }

    fn slot_mut(&mut self, id: SlotId) -> Result<&mut Slot, CoordinatorError> {
        self.slots
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(CoordinatorError::UnknownSlot(id))
    }
}

impl fmt::Debug for TimerCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerCoordinator")
            .field("slots", &self.slots)
            .field("max_timers", &self.max_timers)
            .finish_non_exhaustive()
    }
}
