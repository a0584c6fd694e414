//! End-to-end countdowns through the interval tick source and dispatch task

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use multi_timer::{
    coordinator::{IntervalTickSource, SharedCoordinator, SlotEvent, TimerCoordinator, TICK_PERIOD},
    model::{TimerEvent, TimerState},
    services::AlertChannel,
    tasks::tick_dispatch_task,
    SlotId,
};

#[derive(Default)]
struct CountingAlert {
    plays: Mutex<usize>,
    stops: Mutex<usize>,
}

impl CountingAlert {
    fn plays(&self) -> usize {
        *self.plays.lock().unwrap()
    }

    fn stops(&self) -> usize {
        *self.stops.lock().unwrap()
    }
}

impl AlertChannel for CountingAlert {
    fn play_alert(&self) {
        *self.plays.lock().unwrap() += 1;
    }

    fn stop_alert(&self) {
        *self.stops.lock().unwrap() += 1;
    }
}

fn session(max_timers: usize) -> (SharedCoordinator, Arc<CountingAlert>) {
    let alert = Arc::new(CountingAlert::default());
    let (source, ticks) = IntervalTickSource::new(TICK_PERIOD);
    let coordinator = TimerCoordinator::new(
        max_timers,
        Arc::clone(&alert) as Arc<dyn AlertChannel>,
        Arc::new(source),
    )
    .into_shared();
    tokio::spawn(tick_dispatch_task(Arc::clone(&coordinator), ticks));
    (coordinator, alert)
}

fn armed(coordinator: &SharedCoordinator, seconds: u32) -> SlotId {
    let mut coordinator = coordinator.lock().unwrap();
    let id = coordinator.add_slot().unwrap();
    coordinator.request_set_duration(id, seconds).unwrap();
    id
}

fn state_of(coordinator: &SharedCoordinator, id: SlotId) -> (TimerState, u32) {
    let snapshot = coordinator.lock().unwrap().slot_snapshot(id).unwrap();
    (snapshot.state, snapshot.remaining_seconds)
}

fn drain(events: &mut tokio::sync::broadcast::Receiver<SlotEvent>) -> Vec<SlotEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

#[tokio::test(start_paused = true)]
async fn five_second_timer_ticks_down_and_alerts_once() {
    let (coordinator, alert) = session(3);
    let id = armed(&coordinator, 5);
    let mut events = coordinator.lock().unwrap().subscribe_events();

    assert!(coordinator.lock().unwrap().request_start(id).unwrap());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Running, 3));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Finished, 0));
    assert_eq!(alert.plays(), 1);
    assert_eq!(coordinator.lock().unwrap().live_subscriptions(), 0);

    let ticks: Vec<u32> = drain(&mut events)
        .into_iter()
        .filter_map(|e| match e.event {
            TimerEvent::Tick { remaining_seconds } => Some(remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn paused_timer_receives_no_ticks() {
    let (coordinator, _alert) = session(3);
    let id = armed(&coordinator, 10);
    coordinator.lock().unwrap().request_start(id).unwrap();

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(coordinator.lock().unwrap().request_pause(id).unwrap());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Paused, 9));

    coordinator.lock().unwrap().request_start(id).unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Running, 7));
}

#[tokio::test(start_paused = true)]
async fn simultaneous_finishes_each_trigger_the_alert() {
    let (coordinator, alert) = session(3);
    let a = armed(&coordinator, 3);
    let b = armed(&coordinator, 3);
    {
        let mut coordinator = coordinator.lock().unwrap();
        coordinator.request_start(a).unwrap();
        coordinator.request_start(b).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(3500)).await;

    assert_eq!(state_of(&coordinator, a), (TimerState::Finished, 0));
    assert_eq!(state_of(&coordinator, b), (TimerState::Finished, 0));
    assert_eq!(alert.plays(), 2);
}

#[tokio::test(start_paused = true)]
async fn each_finish_is_handled_before_the_next_slot() {
    let (coordinator, _alert) = session(3);
    let a = armed(&coordinator, 1);
    let b = armed(&coordinator, 1);
    let mut events = coordinator.lock().unwrap().subscribe_events();
    {
        let mut coordinator = coordinator.lock().unwrap();
        coordinator.request_start(a).unwrap();
        coordinator.request_start(b).unwrap();
    }

    tokio::time::sleep(Duration::from_millis(1500)).await;

    let seen = drain(&mut events);
    let completions: Vec<usize> = seen
        .iter()
        .enumerate()
        .filter(|(_, e)| e.event == TimerEvent::Completed)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(completions.len(), 2);

    // A slot's final tick, state change and completion are never split by another slot
    for i in completions {
        let slot = seen[i].slot;
        assert_eq!(seen[i - 1].slot, slot);
        assert_eq!(seen[i - 1].event, TimerEvent::StateChanged { state: TimerState::Finished });
        assert_eq!(seen[i - 2].slot, slot);
        assert_eq!(seen[i - 2].event, TimerEvent::Tick { remaining_seconds: 0 });
    }
}

#[tokio::test(start_paused = true)]
async fn reset_mid_run_stops_ticking_and_silences() {
    let (coordinator, alert) = session(3);
    let id = armed(&coordinator, 20);
    coordinator.lock().unwrap().request_start(id).unwrap();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    let stops_before = alert.stops();
    coordinator.lock().unwrap().request_reset(id).unwrap();

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Idle, 20));
    assert_eq!(alert.stops(), stops_before + 1);
    assert_eq!(coordinator.lock().unwrap().live_subscriptions(), 0);
}

#[tokio::test(start_paused = true)]
async fn finished_timer_restarts_from_full_duration() {
    let (coordinator, alert) = session(1);
    let id = armed(&coordinator, 2);
    coordinator.lock().unwrap().request_start(id).unwrap();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Finished, 0));

    assert!(coordinator.lock().unwrap().request_start(id).unwrap());
    assert_eq!(state_of(&coordinator, id), (TimerState::Running, 2));

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(state_of(&coordinator, id), (TimerState::Finished, 0));
    assert_eq!(alert.plays(), 2);
}
