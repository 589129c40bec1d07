//! Edit screen state holder.
//!
//! # Responsibility
//! - Hold a live view of one item and local edits against it.
//! - Turn save/delete intents into store calls, navigation and error signals.
//!
//! # Invariants
//! - `completed_at` is recomputed from the `completed` flag on every save:
//!   `Some(now)` when completed, `None` otherwise.
//! - Save/delete against an item that never loaded produce a not-found error
//!   signal and no storage call.

use crate::model::todo::{now_epoch_ms, TodoId};
use crate::observe::OneShotEvent;
use crate::store::todo_store::{LiveItem, StoreHandle};
use std::sync::Arc;

/// State holder for editing a single to-do item.
pub struct EditTodoViewModel {
    store: StoreHandle,
    todo: LiveItem,
    navigate_to_list: Arc<OneShotEvent<()>>,
    error_event: Arc<OneShotEvent<String>>,
}

impl EditTodoViewModel {
    pub fn new(store: StoreHandle, todo_id: TodoId) -> Self {
        let todo = store.get_by_id(todo_id);
        Self {
            store,
            todo,
            navigate_to_list: Arc::new(OneShotEvent::new()),
            error_event: Arc::new(OneShotEvent::new()),
        }
    }

    /// Live view of the edited item; `None` until loaded or when absent.
    pub fn todo(&self) -> &LiveItem {
        &self.todo
    }

    /// One-shot "back to the list" signal after a successful save or delete.
    pub fn navigate_to_list(&self) -> &Arc<OneShotEvent<()>> {
        &self.navigate_to_list
    }

    /// One-shot human-readable error messages.
    pub fn error_event(&self) -> &Arc<OneShotEvent<String>> {
        &self.error_event
    }

    /// Applies an edited title to the local live view (not yet persisted).
    pub fn set_title(&self, title: impl Into<String>) {
        if let Some(mut current) = self.todo.get() {
            current.title = title.into();
            self.todo.set(Some(current));
        }
    }

    /// Applies an edited completion flag to the local live view (not yet
    /// persisted). The timestamp is settled at save time.
    pub fn set_completed(&self, completed: bool) {
        if let Some(mut current) = self.todo.get() {
            current.completed = completed;
            self.todo.set(Some(current));
        }
    }

    /// Persists the current edits.
    ///
    /// Sets `completed_at` from the completed flag, dispatches the update and
    /// fires navigate-to-list on completion. An unloaded item or a
    /// persistence failure surfaces an error signal instead.
    pub fn save_changes(&self) {
        let Some(mut current) = self.todo.get() else {
            self.error_event.set("Todo item not found.".to_string());
            return;
        };

        current.apply_completion_timestamp(now_epoch_ms());
        let navigate_to_list = Arc::clone(&self.navigate_to_list);
        let error_event = Arc::clone(&self.error_event);
        self.store.update(current, move |result| match result {
            Ok(()) => navigate_to_list.set(()),
            Err(err) => error_event.set(format!("Failed to update todo item: {err}")),
        });
    }

    /// Deletes the item and navigates back on completion.
    pub fn delete_todo_item(&self) {
        let Some(current) = self.todo.get() else {
            self.error_event.set("Todo item not found.".to_string());
            return;
        };
        let Some(id) = current.id else {
            // A loaded item always carries a storage id; guard anyway so a
            // hand-constructed view cannot panic the store path.
            self.error_event.set("Todo item not found.".to_string());
            return;
        };

        let navigate_to_list = Arc::clone(&self.navigate_to_list);
        let error_event = Arc::clone(&self.error_event);
        self.store.delete(id, move |result| match result {
            Ok(()) => navigate_to_list.set(()),
            Err(err) => error_event.set(format!("Failed to delete todo item: {err}")),
        });
    }

    /// Disarms the navigate signal once navigation has happened, so a
    /// lifecycle re-subscription does not re-trigger it.
    pub fn on_navigated_to_list(&self) {
        self.navigate_to_list.clear();
    }
}
