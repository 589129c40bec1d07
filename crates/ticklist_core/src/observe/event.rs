//! One-shot event with consume-on-first-delivery semantics.

use super::SubscriptionId;
use log::warn;
use parking_lot::Mutex;
use std::sync::Arc;

type EventCallback<T> = Arc<dyn Fn(T) + Send + Sync>;

struct EventState<T> {
    pending: Option<T>,
    next_id: SubscriptionId,
    subscribers: Vec<(SubscriptionId, EventCallback<T>)>,
}

/// An event value delivered to at most one subscriber, exactly once per set.
///
/// The state machine is `idle -> pending(value) -> idle`: [`OneShotEvent::set`]
/// moves to pending and, when a subscriber is attached, consumes the value
/// right away; otherwise the next subscriber to attach consumes it. Consuming
/// happens atomically under the internal lock, so an observer re-attach cycle
/// (UI teardown and recreate) can never replay a delivered event.
///
/// Setting again while pending replaces the undelivered value; there is still
/// at most one delivery.
pub struct OneShotEvent<T> {
    state: Mutex<EventState<T>>,
}

impl<T: Send> OneShotEvent<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EventState {
                pending: None,
                next_id: 0,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Triggers the event. Delivered to the first attached subscriber, or
    /// parked as pending until one attaches.
    pub fn set(&self, value: T) {
        let delivery = {
            let mut state = self.state.lock();
            if state.subscribers.len() > 1 {
                warn!(
                    "event=one_shot_dispatch module=observe status=warn subscribers={} note=only_first_notified",
                    state.subscribers.len()
                );
            }
            match state.subscribers.first().map(|(_, callback)| Arc::clone(callback)) {
                Some(callback) => {
                    state.pending = None;
                    Some((callback, value))
                }
                None => {
                    state.pending = Some(value);
                    None
                }
            }
        };

        if let Some((callback, value)) = delivery {
            callback(value);
        }
    }

    /// Resets the event to idle without notifying anyone.
    pub fn clear(&self) {
        self.state.lock().pending = None;
    }

    /// Whether a trigger is parked waiting for a subscriber.
    pub fn is_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }

    /// Registers `callback`; a parked trigger is consumed and delivered to it
    /// immediately.
    pub fn subscribe(&self, callback: impl Fn(T) + Send + Sync + 'static) -> SubscriptionId {
        let callback: EventCallback<T> = Arc::new(callback);
        let (id, parked) = {
            let mut state = self.state.lock();
            let id = state.next_id;
            state.next_id += 1;
            state.subscribers.push((id, Arc::clone(&callback)));
            (id, state.pending.take())
        };

        if let Some(value) = parked {
            callback(value);
        }
        id
    }

    /// Removes a subscriber. Returns whether it was still registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.state.lock();
        let before = state.subscribers.len();
        state.subscribers.retain(|(sub_id, _)| *sub_id != id);
        state.subscribers.len() < before
    }
}

impl<T: Send> Default for OneShotEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::OneShotEvent;
    use std::sync::mpsc;

    #[test]
    fn subscriber_attached_before_set_receives_exactly_one_notification() {
        let event = OneShotEvent::new();
        let (tx, rx) = mpsc::channel();
        event.subscribe(move |v: i64| tx.send(v).unwrap());

        event.set(5);
        assert_eq!(rx.try_recv().unwrap(), 5);
        assert!(rx.try_recv().is_err());
        assert!(!event.is_pending());
    }

    #[test]
    fn pending_trigger_is_consumed_by_next_subscriber() {
        let event = OneShotEvent::new();
        event.set("navigate");
        assert!(event.is_pending());

        let (tx, rx) = mpsc::channel();
        event.subscribe(move |v: &str| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), "navigate");
        assert!(!event.is_pending());
    }

    #[test]
    fn cleared_trigger_is_not_replayed_to_late_subscribers() {
        let event = OneShotEvent::new();
        event.set(5);
        event.clear();

        let (tx, rx) = mpsc::channel();
        event.subscribe(move |v: i64| tx.send(v).unwrap());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn reattach_cycle_never_replays_a_delivered_event() {
        let event = OneShotEvent::new();
        let (tx, rx) = mpsc::channel();
        let first = event.subscribe(move |v: i64| tx.send(v).unwrap());
        event.set(9);
        assert_eq!(rx.try_recv().unwrap(), 9);

        event.unsubscribe(first);
        let (tx2, rx2) = mpsc::channel();
        event.subscribe(move |v: i64| tx2.send(v).unwrap());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn set_while_pending_keeps_a_single_delivery_with_latest_value() {
        let event = OneShotEvent::new();
        event.set(1);
        event.set(2);

        let (tx, rx) = mpsc::channel();
        event.subscribe(move |v: i64| tx.send(v).unwrap());
        assert_eq!(rx.try_recv().unwrap(), 2);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn only_first_subscriber_is_notified() {
        let event = OneShotEvent::new();
        let (tx_a, rx_a) = mpsc::channel();
        let (tx_b, rx_b) = mpsc::channel();
        event.subscribe(move |v: i64| tx_a.send(v).unwrap());
        event.subscribe(move |v: i64| tx_b.send(v).unwrap());

        event.set(3);
        assert_eq!(rx_a.try_recv().unwrap(), 3);
        assert!(rx_b.try_recv().is_err());
    }
}
