//! Platform events, listeners and resize debouncing

use std::fmt;
use std::time::{Duration, Instant};

use indexmap::IndexMap;

/// Delay between the last resize event and the `resize` notification
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(200);

/// Events delivered by the host runtime
///
/// The host forwards these to [`Platform::handle_event`](crate::Platform::handle_event).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostEvent {
    /// The window finished loading
    WindowLoad,
    /// The native bridge reported that the device is ready
    DeviceReady,
    /// Application went to the background
    Pause,
    /// Application came back to the foreground
    Resume,
    /// Hardware back button pressed
    BackButton,
    /// Window was resized at the given instant
    Resize(Instant),
}

/// Handle returned by [`EventEmitter::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

/// Fire-and-forget publish point
///
/// Listeners run in registration order.
pub struct EventEmitter<T> {
    listeners: IndexMap<u64, Box<dyn Fn(&T)>>,
    next_id: u64,
}

impl<T> EventEmitter<T> {
    /// Create an emitter with no listeners
    pub fn new() -> Self {
        Self {
            listeners: IndexMap::new(),
            next_id: 0,
        }
    }

    /// Register a listener
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(id, Box::new(listener));
        ListenerHandle(id)
    }

    /// Remove a listener; returns false if it was already gone
    pub fn unsubscribe(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.shift_remove(&handle.0).is_some()
    }

    /// Notify every listener
    pub fn emit(&self, event: &T) {
        for listener in self.listeners.values() {
            listener(event);
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Trailing-edge debounce driven by caller-supplied instants
///
/// Each call to [`schedule`](Self::schedule) replaces the pending deadline,
/// so a burst of events produces a single firing `delay` after the last one.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create a debouncer with a fixed delay
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Schedule (or reschedule) the pending invocation
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Drop the pending invocation
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether an invocation is pending
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true exactly once when the pending deadline has passed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}
