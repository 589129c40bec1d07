//! Observable state primitives for UI-facing layers.
//!
//! # Responsibility
//! - Provide a latest-value observable for continuous screen state.
//! - Provide a one-shot event for signals that must fire at most once per
//!   trigger (navigation, error toasts, focus resets).
//!
//! # Invariants
//! - [`ObservableValue`] delivers the current value immediately on subscribe
//!   and every later value to all live subscribers.
//! - [`OneShotEvent`] delivers a pending value to exactly one subscriber,
//!   then returns to idle; re-attaching subscribers never replays it.
//! - Callbacks run on the publishing thread; embedding UIs marshal delivery
//!   to their own context.

mod event;
mod value;

pub use event::OneShotEvent;
pub use value::ObservableValue;

/// Handle for removing a subscriber from an observable.
pub type SubscriptionId = u64;
