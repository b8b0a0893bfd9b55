//! Image-changed notification plumbing.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Receiver of "wallpaper image changed" notifications.
pub trait ImageChangeListener: Send + Sync {
    /// Called after the image source starts yielding a different image.
    fn on_image_changed(&self);
}

/// Handle returned by [`ImageChangeSource::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

/// Broadcaster of image-changed notifications.
///
/// Sources only hold weak references; a listener that has been dropped is never called.
pub trait ImageChangeSource: Send + Sync {
    /// Register `listener`; it stays registered until unsubscribed or dropped.
    fn subscribe(&self, listener: Weak<dyn ImageChangeListener>) -> SubscriptionId;

    /// Remove a registration. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Weak<dyn ImageChangeListener>)>,
}

/// In-process [`ImageChangeSource`] that fans a notification out to every live listener.
#[derive(Default)]
pub struct ImageChangeBus {
    state: Mutex<BusState>,
}

impl ImageChangeBus {
    /// Empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one notification; returns how many listeners were called.
    ///
    /// Listeners run outside the bus lock, so they may subscribe or unsubscribe re-entrantly.
    pub fn notify(&self) -> usize {
        let live: Vec<Arc<dyn ImageChangeListener>> = {
            let mut state = self.state();
            state.listeners.retain(|(_, l)| l.strong_count() > 0);
            state
                .listeners
                .iter()
                .filter_map(|(_, l)| l.upgrade())
                .collect()
        };
        tracing::debug!(listeners = live.len(), "image source changed");
        for listener in &live {
            listener.on_image_changed();
        }
        live.len()
    }

    /// Number of registrations whose listener is still alive.
    pub fn listener_count(&self) -> usize {
        self.state()
            .listeners
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }
}

impl ImageChangeSource for ImageChangeBus {
    fn subscribe(&self, listener: Weak<dyn ImageChangeListener>) -> SubscriptionId {
        let mut state = self.state();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.state().listeners.retain(|(sid, _)| *sid != id);
    }
}

impl<T: ImageChangeSource + ?Sized> ImageChangeSource for Arc<T> {
    fn subscribe(&self, listener: Weak<dyn ImageChangeListener>) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}

#[cfg(test)]
#[path = "../tests/unit/events.rs"]
mod tests;
