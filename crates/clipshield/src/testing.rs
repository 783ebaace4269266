//! In-memory collaborators for driving the monitor in tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::gateway::ClipboardGateway;
use crate::notify::Notifier;
use crate::paste::{PasteSignalSource, PasteSink};
use crate::scheduler::{Clock, Scheduler, TimerHandle};

#[derive(Debug, Default)]
struct ClipboardState {
    content: Option<String>,
    change_count: u64,
    concealed_writes: Vec<String>,
    clears: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// A clipboard with an explicit change counter.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeClipboard(Rc<RefCell<ClipboardState>>);

impl FakeClipboard {
    /// Simulate another application copying `text`.
    pub(crate) fn copy(&self, text: &str) {
        let mut state = self.0.borrow_mut();
        state.content = Some(text.to_string());
        state.change_count += 1;
    }

    pub(crate) fn content(&self) -> Option<String> {
        self.0.borrow().content.clone()
    }

    pub(crate) fn concealed_writes(&self) -> Vec<String> {
        self.0.borrow().concealed_writes.clone()
    }

    pub(crate) fn clears(&self) -> usize {
        self.0.borrow().clears
    }

    pub(crate) fn set_fail_reads(&self, fail: bool) {
        self.0.borrow_mut().fail_reads = fail;
    }

    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.0.borrow_mut().fail_writes = fail;
    }
}

impl ClipboardGateway for FakeClipboard {
    fn change_count(&self) -> u64 {
        self.0.borrow().change_count
    }

    fn read_text(&self) -> Result<Option<String>> {
        let state = self.0.borrow();
        if state.fail_reads {
            return Err(Error::clipboard("read refused"));
        }
        Ok(state.content.clone())
    }

    fn write_concealed(&self, text: &str) -> Result<()> {
        let mut state = self.0.borrow_mut();
        state.change_count += 1;
        if state.fail_writes {
            return Err(Error::clipboard("write refused"));
        }
        state.content = Some(text.to_string());
        state.concealed_writes.push(text.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut state = self.0.borrow_mut();
        state.change_count += 1;
        if state.fail_writes {
            return Err(Error::clipboard("write refused"));
        }
        state.content = None;
        state.clears += 1;
        Ok(())
    }
}

/// What kind of timer was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerSpec {
    Repeating(Duration),
    Once(Duration),
}

#[derive(Debug, Default)]
struct SchedulerState {
    next_id: u64,
    active: BTreeMap<TimerHandle, TimerSpec>,
}

/// A scheduler whose timers only fire when the test says so.
#[derive(Debug, Clone, Default)]
pub(crate) struct ManualScheduler(Rc<RefCell<SchedulerState>>);

impl ManualScheduler {
    /// The first live timer matching `spec`.
    pub(crate) fn find(&self, spec: TimerSpec) -> Option<TimerHandle> {
        self.0
            .borrow()
            .active
            .iter()
            .find_map(|(handle, s)| (*s == spec).then_some(*handle))
    }

    pub(crate) fn is_active(&self, handle: TimerHandle) -> bool {
        self.0.borrow().active.contains_key(&handle)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.0.borrow().active.len()
    }

    fn schedule(&self, spec: TimerSpec) -> TimerHandle {
        let mut state = self.0.borrow_mut();
        state.next_id += 1;
        let handle = TimerHandle::new(state.next_id);
        state.active.insert(handle, spec);
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        self.schedule(TimerSpec::Repeating(interval))
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerHandle {
        self.schedule(TimerSpec::Once(delay))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.0.borrow_mut().active.remove(&handle);
    }
}

/// A clock that only moves when advanced.
#[derive(Debug, Clone)]
pub(crate) struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub(crate) fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

#[derive(Debug, Default)]
struct NotifierState {
    messages: Vec<String>,
    fail: bool,
}

/// Records every notification.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingNotifier(Rc<RefCell<NotifierState>>);

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.0.borrow().messages.clone()
    }

    pub(crate) fn set_fail(&self, fail: bool) {
        self.0.borrow_mut().fail = fail;
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) -> Result<()> {
        let mut state = self.0.borrow_mut();
        state.messages.push(message.to_string());
        if state.fail {
            return Err(Error::notification("notification center unavailable"));
        }
        Ok(())
    }
}

#[derive(Debug)]
struct PasteState {
    available: bool,
    sink: Option<PasteSink>,
    installs: usize,
    removes: usize,
}

/// A paste source fired by hand.
#[derive(Debug, Clone)]
pub(crate) struct FakePasteSource(Rc<RefCell<PasteState>>);

impl FakePasteSource {
    pub(crate) fn new(available: bool) -> Self {
        Self(Rc::new(RefCell::new(PasteState {
            available,
            sink: None,
            installs: 0,
            removes: 0,
        })))
    }

    pub(crate) fn is_installed(&self) -> bool {
        self.0.borrow().sink.is_some()
    }

    pub(crate) fn installs(&self) -> usize {
        self.0.borrow().installs
    }

    pub(crate) fn removes(&self) -> usize {
        self.0.borrow().removes
    }

    /// Simulate a paste keystroke. Returns whether a sink received it.
    pub(crate) fn press_paste(&self) -> bool {
        let sink = self.0.borrow().sink.clone();
        match sink {
            Some(sink) => {
                sink.signal();
                true
            }
            None => false,
        }
    }
}

impl PasteSignalSource for FakePasteSource {
    fn is_available(&self) -> bool {
        self.0.borrow().available
    }

    fn install(&mut self, sink: PasteSink) -> Result<()> {
        let mut state = self.0.borrow_mut();
        state.sink = Some(sink);
        state.installs += 1;
        Ok(())
    }

    fn remove(&mut self) {
        let mut state = self.0.borrow_mut();
        state.sink = None;
        state.removes += 1;
    }
}
