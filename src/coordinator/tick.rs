//! Periodic tick sources
//!
//! A tick source starts one repeating subscription per running slot. Every
//! period it delivers a [`Tick`] naming the slot and the subscription that
//! produced it; the coordinator drops ticks from subscriptions it has released.

use std::{fmt, time::Duration};

use tokio::{
    runtime::Handle,
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use super::SlotId;

/// Interval between ticks for a running timer
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Identifies one subscription for the lifetime of a coordinator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tick delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub slot: SlotId,
    pub subscription: SubscriptionId,
}

/// Something that can deliver a tick once per period until cancelled
pub trait TickSource: Send + Sync {
    /// Begin delivering `tick` every period. The subscription stops when
    /// cancelled or dropped.
    fn subscribe(&self, tick: Tick) -> Box<dyn TickSubscription>;
}

/// Handle to a live periodic delivery
pub trait TickSubscription: Send {
    /// Stop delivering. Must be synchronous and safe to call more than once.
    fn cancel(&mut self);
}

/// Tick source backed by one `tokio::time::interval` task per subscription.
///
/// Ticks from every subscription are funnelled into a single channel so that
/// a single consumer processes them one at a time. Subscription tasks are
/// spawned on the runtime captured at construction.
#[derive(Debug)]
pub struct IntervalTickSource {
    period: Duration,
    tx: mpsc::UnboundedSender<Tick>,
    runtime: Option<Handle>,
}

impl IntervalTickSource {
    /// Create a source on the current runtime, if any, and the receiver its
    /// ticks are delivered to
    pub fn new(period: Duration) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::build(period, Handle::try_current().ok())
    }

    /// Create a source that spawns its subscriptions on `runtime`
    pub fn with_runtime(
        period: Duration,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        Self::build(period, Some(runtime))
    }

    fn build(period: Duration, runtime: Option<Handle>) -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { period, tx, runtime }, rx)
    }
}

impl TickSource for IntervalTickSource {
    fn subscribe(&self, tick: Tick) -> Box<dyn TickSubscription> {
        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            error!(
                "No async runtime for tick subscription {}, timer {} will not advance",
                tick.subscription, tick.slot
            );
            return Box::new(DetachedSubscription);
        };

        let tx = self.tx.clone();
        let period = self.period;

        let handle = runtime.spawn(async move {
            // First tick lands one full period after subscribing
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if tx.send(tick).is_err() {
                    debug!("Tick receiver closed, stopping subscription {}", tick.subscription);
                    break;
                }
            }
        });

        Box::new(IntervalSubscription { handle })
    }
}

struct IntervalSubscription {
    handle: JoinHandle<()>,
}

impl TickSubscription for IntervalSubscription {
    fn cancel(&mut self) {
        self.handle.abort();
    }
}

impl Drop for IntervalSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Stand-in returned when no runtime is available; it never delivers
struct DetachedSubscription;

impl TickSubscription for DetachedSubscription {
    fn cancel(&mut self) {}
}
