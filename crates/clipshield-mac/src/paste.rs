//! Global Cmd+V listener.
//!
//! Listening requires the accessibility permission. The underlying event tap
//! cannot be torn down once started, so the listener thread is spawned on the
//! first install and lives for the rest of the process; removing the listener
//! only detaches the callback.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use rdev::{EventType, Key};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while starting the paste listener.
#[derive(Debug, Error)]
pub enum PasteListenerError {
    /// The listener thread could not be spawned.
    #[error("failed to spawn paste listener thread: {0}")]
    Spawn(#[from] std::io::Error),
}

type Callback = Arc<dyn Fn() + Send + Sync>;
type Slot = Arc<Mutex<Option<Callback>>>;

/// Reports Cmd+V keystrokes system-wide.
#[derive(Default)]
pub struct PasteListener {
    callback: Slot,
    started: bool,
}

impl PasteListener {
    /// Create a detached listener.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the process may observe global key events.
    #[must_use]
    pub fn is_available() -> bool {
        crate::permissions::is_accessibility_enabled()
    }

    /// Attach `callback`, starting the listener thread if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener thread cannot be spawned.
    pub fn install(
        &mut self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Result<(), PasteListenerError> {
        *self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(callback));

        if !self.started {
            let slot = Arc::clone(&self.callback);
            thread::Builder::new()
                .name("clipshield-paste".to_string())
                .spawn(move || listen(&slot))?;
            self.started = true;
            debug!("Paste listener thread started");
        }
        Ok(())
    }

    /// Detach the callback.
    pub fn remove(&mut self) {
        *self
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a callback is attached.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for PasteListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasteListener")
            .field("installed", &self.is_installed())
            .field("started", &self.started)
            .finish()
    }
}

/// Tracks the Command modifier and recognises Cmd+V.
#[derive(Debug, Default)]
struct ShortcutState {
    command_down: bool,
}

impl ShortcutState {
    /// Feed one event; returns `true` when it completes a paste shortcut.
    fn feed(&mut self, event: &EventType) -> bool {
        match event {
            EventType::KeyPress(Key::MetaLeft | Key::MetaRight) => {
                self.command_down = true;
                false
            }
            EventType::KeyRelease(Key::MetaLeft | Key::MetaRight) => {
                self.command_down = false;
                false
            }
            EventType::KeyPress(Key::KeyV) => self.command_down,
            _ => false,
        }
    }
}

fn listen(slot: &Slot) {
    let slot = Arc::clone(slot);
    let mut shortcut = ShortcutState::default();
    let result = rdev::listen(move |event| {
        if shortcut.feed(&event.event_type) {
            let callback = slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            if let Some(callback) = callback {
                callback();
            }
        }
    });
    if let Err(e) = result {
        warn!(error = ?e, "Paste listener stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_shortcut_requires_command() {
        let mut state = ShortcutState::default();
        assert!(!state.feed(&EventType::KeyPress(Key::KeyV)));
    }

    #[test]
    fn test_shortcut_command_v() {
        let mut state = ShortcutState::default();
        assert!(!state.feed(&EventType::KeyPress(Key::MetaLeft)));
        assert!(state.feed(&EventType::KeyPress(Key::KeyV)));
        assert!(state.feed(&EventType::KeyPress(Key::KeyV)));
    }

    #[test]
    fn test_shortcut_released_command() {
        let mut state = ShortcutState::default();
        state.feed(&EventType::KeyPress(Key::MetaRight));
        state.feed(&EventType::KeyRelease(Key::MetaRight));
        assert!(!state.feed(&EventType::KeyPress(Key::KeyV)));
    }

    #[test]
    fn test_shortcut_other_keys() {
        let mut state = ShortcutState::default();
        state.feed(&EventType::KeyPress(Key::MetaLeft));
        assert!(!state.feed(&EventType::KeyPress(Key::KeyC)));
    }

    #[test]
    fn test_listener_remove_detaches_callback() {
        let listener = PasteListener::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        *listener.callback.lock().unwrap() = Some(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert!(listener.is_installed());

        let mut listener = listener;
        listener.remove();
        assert!(!listener.is_installed());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_debug() {
        let listener = PasteListener::new();
        let debug = format!("{listener:?}");
        assert!(debug.contains("PasteListener"));
        assert!(debug.contains("installed"));
    }
}
