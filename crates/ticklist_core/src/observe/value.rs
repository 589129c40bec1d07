//! Latest-value observable for continuous state.

use super::SubscriptionId;
use parking_lot::Mutex;
use std::sync::Arc;

type ValueCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ValueState<T> {
    value: T,
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, ValueCallback<T>)>,
}

/// Holds a current value and re-emits every change to all subscribers.
///
/// Subscribing delivers the current value immediately, so late subscribers
/// (a screen re-attaching after teardown) catch up without extra plumbing.
///
/// Callbacks are invoked outside the internal lock, so they may safely call
/// back into this observable. A subscriber registered concurrently with a
/// `set` may observe the initial snapshot after the newer value; continuous
/// state consumers render whatever arrives last and tolerate this.
pub struct ObservableValue<T> {
    state: Mutex<ValueState<T>>,
}

impl<T: Clone + Send> ObservableValue<T> {
    pub fn new(initial: T) -> Self {
        Self {
            state: Mutex::new(ValueState {
                value: initial,
                next_id: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Returns a clone of the current value.
    pub fn get(&self) -> T {
        self.state.lock().value.clone()
    }

    /// Stores `value` and notifies every live subscriber with it.
    pub fn set(&self, value: T) {
        let callbacks: Vec<ValueCallback<T>> = {
            let mut state = self.state.lock();
            state.value = value.clone();
            state
                .subscribers
                .iter()
                .map(|(_, callback)| Arc::clone(callback))
                .collect()
        };

        for callback in callbacks {
            callback(&value);
        }
    }

    /// Registers `callback` and immediately delivers the current value to it.
    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> SubscriptionId {
        let callback: ValueCallback<T> = Arc::new(callback);
        let (id, snapshot) = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, Arc::clone(&callback)));
            (id, state.value.clone())
        };

        callback(&snapshot);
        id
    }

    /// Removes a subscriber. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sub_id, _)| *sub_id != id);
        state.subscribers.len() < before
    }

    /// Number of live subscribers. Mostly useful in tests.
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }
}

impl<T: Clone + Send + Default> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
