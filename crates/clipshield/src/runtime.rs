//! The event loop that drives a [`Monitor`].
//!
//! Every input to the monitor (timer firings, paste signals, manual clears,
//! settings changes) is funnelled through one unbounded channel and handled
//! sequentially by [`run`]. Nothing touches the monitor concurrently, so the
//! monitor and its collaborators need not be `Send`.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::monitor::Monitor;
use crate::paste::PasteSink;
use crate::scheduler::TimerHandle;

/// An input to the monitor event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A scheduled timer fired.
    Timer(TimerHandle),
    /// The user pasted.
    Paste,
    /// The user asked for an immediate clear.
    ClearNow,
    /// Settings were edited; re-read the `enabled` flag.
    SettingsChanged,
    /// Stop the monitor and leave the loop.
    Shutdown,
}

/// Receiving end of the monitor event queue.
pub type EventReceiver = UnboundedReceiver<Event>;

/// Cloneable handle for sending events to a running monitor.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    tx: UnboundedSender<Event>,
}

impl MonitorHandle {
    /// The raw sender, for collaborators that post their own events.
    #[must_use]
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    /// A paste sink that forwards paste signals into the event loop.
    #[must_use]
    pub fn paste_sink(&self) -> PasteSink {
        let handle = self.clone();
        PasteSink::new(move || handle.paste())
    }

    /// Clear the clipboard now.
    pub fn clear_now(&self) {
        self.send(Event::ClearNow);
    }

    /// Report a paste.
    pub fn paste(&self) {
        self.send(Event::Paste);
    }

    /// Tell the monitor its settings changed.
    pub fn settings_changed(&self) {
        self.send(Event::SettingsChanged);
    }

    /// Stop the monitor and end [`run`].
    pub fn shutdown(&self) {
        self.send(Event::Shutdown);
    }

    /// Whether the event loop has gone away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            debug!(?event, "Monitor event loop has exited, event dropped");
        }
    }
}

/// Create the monitor event queue.
#[must_use]
pub fn channel() -> (MonitorHandle, EventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (MonitorHandle { tx }, rx)
}

/// Drive `monitor` until [`Event::Shutdown`] arrives.
///
/// The monitor is started first if its settings say it is enabled. It is
/// stopped before being returned.
pub async fn run(mut monitor: Monitor, mut events: EventReceiver) -> Monitor {
    monitor.sync_enabled();
    info!("Monitor event loop running");

    while let Some(event) = events.recv().await {
        match event {
            Event::Timer(handle) => monitor.handle_timer(handle),
            Event::Paste => monitor.handle_paste(),
            Event::ClearNow => monitor.clear_now(),
            Event::SettingsChanged => monitor.sync_enabled(),
            Event::Shutdown => {
                debug!("Shutdown requested");
                break;
            }
        }
    }

    monitor.stop();
    info!(
        cleared = monitor.detection_count(),
        "Monitor event loop finished"
    );
    monitor
}
