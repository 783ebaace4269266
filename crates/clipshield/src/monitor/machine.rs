//! The clipboard monitor state machine.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

use super::state::{MonitorState, MonitorStatus};
use crate::config::Config;
use crate::detection::detect;
use crate::gateway::ClipboardGateway;
use crate::notify::{Notifier, CLEARED_MESSAGE};
use crate::paste::{PasteSignalSource, PasteSink};
use crate::scheduler::{Clock, Scheduler, SystemClock, TimerHandle};
use crate::settings::{SettingsProvider, SettingsSnapshot};

/// Countdown tick period.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Timing knobs that are fixed for the lifetime of a monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorOptions {
    /// How often the clipboard change counter is sampled.
    pub poll_interval: Duration,
    /// How long changes are ignored after our own clipboard writes.
    pub debounce: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(500),
            debounce: Duration::from_millis(300),
        }
    }
}

impl From<&Config> for MonitorOptions {
    fn from(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            debounce: config.debounce(),
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    last_change_count: u64,
    last_self_write_at: Option<std::time::Instant>,
    flagged_text: Option<String>,
    detection_count: u64,
    last_detection_label: Option<&'static str>,
}

#[derive(Debug, Default)]
struct Timers {
    poll: Option<TimerHandle>,
    tick: Option<TimerHandle>,
    deadline: Option<TimerHandle>,
}

struct PasteHook {
    source: Box<dyn PasteSignalSource>,
    sink: PasteSink,
    installed: bool,
}

/// Watches the clipboard and clears sensitive content after a countdown.
///
/// The monitor is driven entirely from outside: the runtime calls
/// [`handle_timer`](Self::handle_timer) when a timer scheduled through the
/// [`Scheduler`] fires, [`handle_paste`](Self::handle_paste) when the paste
/// source reports a paste, and [`clear_now`](Self::clear_now) on user request.
/// All calls must come from a single thread.
///
/// Collaborator failures never abort a transition. They are logged and the
/// monitor carries on.
pub struct Monitor {
    settings: Box<dyn SettingsProvider>,
    gateway: Box<dyn ClipboardGateway>,
    scheduler: Box<dyn Scheduler>,
    notifier: Box<dyn Notifier>,
    clock: Box<dyn Clock>,
    paste: Option<PasteHook>,
    options: MonitorOptions,
    state: MonitorState,
    running: bool,
    session: Session,
    timers: Timers,
    last_cleared_at: Option<chrono::DateTime<Utc>>,
    status: watch::Sender<MonitorStatus>,
}

impl Monitor {
    /// Create a stopped monitor.
    pub fn new(
        settings: impl SettingsProvider + 'static,
        gateway: impl ClipboardGateway + 'static,
        scheduler: impl Scheduler + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        let (status, _) = watch::channel(MonitorStatus::default());
        Self {
            settings: Box::new(settings),
            gateway: Box::new(gateway),
            scheduler: Box::new(scheduler),
            notifier: Box::new(notifier),
            clock: Box::new(SystemClock),
            paste: None,
            options: MonitorOptions::default(),
            state: MonitorState::Idle,
            running: false,
            session: Session::default(),
            timers: Timers::default(),
            last_cleared_at: None,
            status,
        }
    }

    /// Use custom polling and debounce timings.
    #[must_use]
    pub fn with_options(mut self, options: MonitorOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom clock for the debounce window.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Shorten countdowns when `source` reports a paste.
    ///
    /// The source is installed with `sink` while the monitor runs. The sink
    /// must eventually lead to a call to [`handle_paste`](Self::handle_paste).
    #[must_use]
    pub fn with_paste_source(
        mut self,
        source: impl PasteSignalSource + 'static,
        sink: PasteSink,
    ) -> Self {
        self.paste = Some(PasteHook {
            source: Box::new(source),
            sink,
            installed: false,
        });
        self
    }

    /// Subscribe to status updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MonitorStatus> {
        self.status.subscribe()
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Whether the monitor is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of times the clipboard has been cleared.
    #[must_use]
    pub fn detection_count(&self) -> u64 {
        self.session.detection_count
    }

    /// Label of the most recent primary detection.
    #[must_use]
    pub fn last_detection_label(&self) -> Option<&'static str> {
        self.session.last_detection_label
    }

    /// A snapshot of the observable state.
    #[must_use]
    pub fn status(&self) -> MonitorStatus {
        MonitorStatus {
            state: self.state,
            enabled: self.running,
            detection_count: self.session.detection_count,
            last_detection_label: self.session.last_detection_label,
            last_cleared_at: self.last_cleared_at,
        }
    }

    /// Start monitoring.
    ///
    /// The current clipboard content becomes the baseline and is not
    /// inspected until it changes. Restarting a running monitor resets it.
    pub fn start(&mut self) {
        self.teardown();

        self.session.last_change_count = self.gateway.change_count();
        self.session.last_self_write_at = None;
        self.session.flagged_text = None;
        self.timers.poll = Some(self.scheduler.schedule_repeating(self.options.poll_interval));
        self.install_paste_source();

        self.running = true;
        self.state = MonitorState::Idle;
        info!(
            poll_interval_ms = self.options.poll_interval.as_millis(),
            "Clipboard monitor started"
        );
        self.publish();
    }

    /// Stop monitoring.
    ///
    /// Cancels all timers and removes the paste source. The state is left as
    /// it was so the last status remains visible.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.teardown();
        self.running = false;
        info!("Clipboard monitor stopped");
        self.publish();
    }

    /// Start or stop to match the `enabled` setting.
    pub fn sync_enabled(&mut self) {
        let enabled = self.settings.snapshot().enabled;
        match (enabled, self.running) {
            (true, false) => self.start(),
            (false, true) => self.stop(),
            _ => trace!(enabled, "Monitor already in requested state"),
        }
    }

    /// React to a timer firing.
    ///
    /// Handles of timers that have been cancelled or replaced are ignored.
    pub fn handle_timer(&mut self, handle: TimerHandle) {
        if self.timers.poll == Some(handle) {
            self.check_clipboard();
        } else if self.timers.tick == Some(handle) {
            self.countdown_tick();
        } else if self.timers.deadline == Some(handle) {
            debug!("Countdown deadline reached");
            self.expire();
        } else {
            trace!(timer = handle.id(), "Ignoring stale timer");
        }
    }

    /// Inspect the clipboard if it changed since the last look.
    pub fn check_clipboard(&mut self) {
        let settings = self.settings.snapshot();
        if !settings.enabled {
            return;
        }

        let count = self.gateway.change_count();
        if count == self.session.last_change_count {
            return;
        }

        if let Some(written_at) = self.session.last_self_write_at {
            let since = self.clock.now().saturating_duration_since(written_at);
            if since < self.options.debounce {
                trace!(?since, "Ignoring clipboard change inside debounce window");
                return;
            }
        }

        let text = match self.gateway.read_text() {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Failed to read clipboard");
                return;
            }
        };
        self.session.last_change_count = count;

        let detections = detect(&text, &settings.enabled_patterns);
        match detections.first() {
            Some(primary) if self.session.flagged_text.as_deref() != Some(text.as_str()) => {
                let label = primary.label;
                self.conceal(text, label, &settings);
            }
            None if self.session.flagged_text.is_some() => {
                self.cancel_countdown();
                self.session.flagged_text = None;
                self.state = MonitorState::Idle;
                info!("Sensitive data replaced on clipboard, countdown cancelled");
                self.publish();
            }
            _ => {}
        }
    }

    /// Shorten the running countdown after the user pasted.
    pub fn handle_paste(&mut self) {
        if !self.running || !self.state.is_counting() {
            trace!("Paste ignored, no countdown running");
            return;
        }
        let delay = self.settings.snapshot().post_paste_delay_secs;
        info!(delay_secs = delay, "Paste detected, shortening countdown");
        self.start_countdown(delay, true);
    }

    /// Clear the clipboard immediately.
    pub fn clear_now(&mut self) {
        self.cancel_countdown();
        info!("Clearing clipboard on request");
        self.clear_clipboard();
    }

    fn conceal(&mut self, text: String, label: &'static str, settings: &SettingsSnapshot) {
        if let Err(e) = self.gateway.write_concealed(&text) {
            error!(error = %e, "Failed to mark clipboard content as concealed");
        }
        self.session.last_change_count = self.gateway.change_count();
        self.session.last_self_write_at = Some(self.clock.now());
        self.session.flagged_text = Some(text);
        self.session.last_detection_label = Some(label);

        info!(
            label,
            delay_secs = settings.clear_delay_secs,
            "Sensitive data detected on clipboard"
        );
        self.start_countdown(settings.clear_delay_secs, false);
    }

    fn start_countdown(&mut self, seconds: u32, accelerated: bool) {
        self.cancel_countdown();
        if seconds == 0 {
            self.expire();
            return;
        }

        self.state = MonitorState::Counting {
            seconds_left: seconds,
            accelerated,
        };
        self.timers.tick = Some(self.scheduler.schedule_repeating(TICK_INTERVAL));
        self.timers.deadline = Some(
            self.scheduler
                .schedule_once(Duration::from_secs(u64::from(seconds))),
        );
        self.publish();
    }

    fn countdown_tick(&mut self) {
        let MonitorState::Counting {
            seconds_left,
            accelerated,
        } = self.state
        else {
            return;
        };

        if seconds_left > 1 {
            self.state = MonitorState::Counting {
                seconds_left: seconds_left - 1,
                accelerated,
            };
            self.publish();
        } else {
            self.expire();
        }
    }

    fn expire(&mut self) {
        self.cancel_countdown();
        info!("Countdown finished, clearing clipboard");
        self.clear_clipboard();
    }

    fn clear_clipboard(&mut self) {
        if let Err(e) = self.gateway.clear() {
            error!(error = %e, "Failed to clear clipboard");
        }
        self.session.last_change_count = self.gateway.change_count();
        self.session.last_self_write_at = Some(self.clock.now());
        self.session.flagged_text = None;
        self.session.detection_count += 1;
        self.last_cleared_at = Some(Utc::now());
        self.state = MonitorState::Cleared;
        self.publish();

        if self.settings.snapshot().notifications_enabled {
            if let Err(e) = self.notifier.notify(CLEARED_MESSAGE) {
                warn!(error = %e, "Failed to deliver notification");
            }
        }
    }

    fn cancel_countdown(&mut self) {
        if let Some(handle) = self.timers.tick.take() {
            self.scheduler.cancel(handle);
        }
        if let Some(handle) = self.timers.deadline.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn teardown(&mut self) {
        if let Some(handle) = self.timers.poll.take() {
            self.scheduler.cancel(handle);
        }
        self.cancel_countdown();
        self.remove_paste_source();
    }

    fn install_paste_source(&mut self) {
        let Some(hook) = self.paste.as_mut() else {
            debug!("No paste source configured");
            return;
        };
        if !hook.source.is_available() {
            info!("Paste detection unavailable, countdowns will run at full length");
            return;
        }
        match hook.source.install(hook.sink.clone()) {
            Ok(()) => {
                hook.installed = true;
                debug!("Paste source installed");
            }
            Err(e) => warn!(error = %e, "Failed to install paste source"),
        }
    }

    fn remove_paste_source(&mut self) {
        if let Some(hook) = self.paste.as_mut() {
            if hook.installed {
                hook.source.remove();
                hook.installed = false;
                debug!("Paste source removed");
            }
        }
    }

    fn publish(&self) {
        self.status.send_replace(self.status());
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("state", &self.state)
            .field("running", &self.running)
            .field("options", &self.options)
            .field("timers", &self.timers)
            .field("detection_count", &self.session.detection_count)
            .field("paste_source", &self.paste.is_some())
            .finish_non_exhaustive()
    }
}
