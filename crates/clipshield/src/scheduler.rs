//! Timers and time sources for the monitor.
//!
//! Timers do not carry callbacks. Scheduling returns a [`TimerHandle`] and the
//! scheduler later delivers that handle back to the monitor (through the
//! runtime event queue), which decides what the firing means. A handle the
//! monitor no longer holds is ignored, so a cancelled timer can never run its
//! effect even if its firing was already queued.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::trace;

use crate::runtime::Event;

/// Identifies a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Create a handle from a raw id.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw id of this handle.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Repeating and one-shot timers with cancellation.
pub trait Scheduler {
    /// Fire `handle` every `interval`, starting one interval from now.
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle;

    /// Fire `handle` once after `delay`.
    fn schedule_once(&mut self, delay: Duration) -> TimerHandle;

    /// Stop a timer. Cancelling an unknown or finished timer is a no-op.
    fn cancel(&mut self, handle: TimerHandle);
}

/// Source of the current instant.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// The system monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A [`Scheduler`] backed by tokio tasks.
///
/// Each timer is a spawned task that sends [`Event::Timer`] into the monitor's
/// event queue. Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct TokioScheduler {
    events: UnboundedSender<Event>,
    next_id: u64,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Create a scheduler that delivers firings to `events`.
    #[must_use]
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            events,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    /// Number of timers that have not finished or been cancelled.
    #[must_use]
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }

    fn next_handle(&mut self) -> TimerHandle {
        // Finished one-shot timers are never cancelled explicitly
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        TimerHandle(self.next_id)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        let handle = self.next_handle();
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if events.send(Event::Timer(handle)).is_err() {
                    break;
                }
            }
        });
        trace!(timer = handle.id(), ?interval, "Scheduled repeating timer");
        self.tasks.insert(handle, task);
        handle
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        let handle = self.next_handle();
        let events = self.events.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(Event::Timer(handle));
        });
        trace!(timer = handle.id(), ?delay, "Scheduled one-shot timer");
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            trace!(timer = handle.id(), "Cancelled timer");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}
