//! Explicit, typed replacement for the ambient window event channel.
//!
//! Delivery is synchronous: `publish` returns after every listener has run.
//! A publish that arrives while a dispatch is in progress (a listener publishing,
//! or another thread) is queued and drained by the dispatch already running, so
//! listener invocations never overlap.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use shared::protocol::GalleryEvent;
use tracing::{debug, trace};

type Listener = Arc<dyn Fn(GalleryEvent) + Send + Sync>;

struct Registered {
    id: u64,
    event: GalleryEvent,
    listener: Listener,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    listeners: Vec<Registered>,
    queue: VecDeque<GalleryEvent>,
    dispatching: bool,
}

fn lock(state: &Mutex<BusState>) -> MutexGuard<'_, BusState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for `event`. The listener stays registered until the
    /// returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unregisters the listener"]
    pub fn subscribe<F>(&self, event: GalleryEvent, listener: F) -> Subscription
    where
        F: Fn(GalleryEvent) + Send + Sync + 'static,
    {
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push(Registered {
            id,
            event,
            listener: Arc::new(listener),
        });
        trace!(event = %event, id, "listener subscribed");

        Subscription {
            id,
            event,
            state: Arc::downgrade(&self.state),
        }
    }

    pub fn publish(&self, event: GalleryEvent) {
        {
            let mut state = lock(&self.state);
            state.queue.push_back(event);
            if state.dispatching {
                debug!(event = %event, "dispatch in progress; broadcast queued");
                return;
            }
            state.dispatching = true;
        }

        let _dispatching = DispatchGuard { state: &self.state };
        loop {
            let (event, listeners) = {
                let mut state = lock(&self.state);
                let Some(event) = state.queue.pop_front() else {
                    state.dispatching = false;
                    break;
                };
                let listeners: Vec<Listener> = state
                    .listeners
                    .iter()
                    .filter(|registered| registered.event == event)
                    .map(|registered| Arc::clone(&registered.listener))
                    .collect();
                (event, listeners)
            };

            debug!(event = %event, listeners = listeners.len(), "dispatching broadcast");
            for listener in listeners {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self, event: GalleryEvent) -> usize {
        lock(&self.state)
            .listeners
            .iter()
            .filter(|registered| registered.event == event)
            .count()
    }
}

/// Unblocks the bus when a listener panics mid-dispatch.
struct DispatchGuard<'a> {
    state: &'a Mutex<BusState>,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = lock(self.state);
            state.dispatching = false;
            state.queue.clear();
        }
    }
}

pub struct Subscription {
    id: u64,
    event: GalleryEvent,
    state: Weak<Mutex<BusState>>,
}

impl Subscription {
    pub fn event(&self) -> GalleryEvent {
        self.event
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state)
                .listeners
                .retain(|registered| registered.id != self.id);
            trace!(event = %self.event, id = self.id, "listener unsubscribed");
        }
    }
}

#[cfg(test)]
#[path = "tests/event_bus_tests.rs"]
mod tests;
