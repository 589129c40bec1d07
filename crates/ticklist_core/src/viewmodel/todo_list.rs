//! List screen state holder.
//!
//! # Responsibility
//! - Hold the live to-do list and the pending new-item title.
//! - Turn user intents (add, delete all, search, item tap) into store calls
//!   and one-shot signals.
//!
//! # Invariants
//! - A blank title never reaches storage; it produces exactly one
//!   validation-error signal.
//! - The navigate signal delivers an item id at most once per tap, surviving
//!   observer teardown/re-attach cycles.

use crate::model::todo::{TodoId, TodoItem};
use crate::observe::{ObservableValue, OneShotEvent};
use crate::store::todo_store::{LiveList, StoreHandle};
use log::warn;
use std::sync::Arc;

/// State holder for the single-screen to-do list.
pub struct TodoListViewModel {
    store: StoreHandle,
    todos: LiveList,
    new_todo_title: Arc<ObservableValue<String>>,
    navigate_to_todo: Arc<OneShotEvent<TodoId>>,
    error_event: Arc<OneShotEvent<String>>,
    reset_focus_event: Arc<OneShotEvent<()>>,
}

impl TodoListViewModel {
    pub fn new(store: StoreHandle) -> Self {
        let todos = store.get_all();
        Self {
            store,
            todos,
            new_todo_title: Arc::new(ObservableValue::new(String::new())),
            navigate_to_todo: Arc::new(OneShotEvent::new()),
            error_event: Arc::new(OneShotEvent::new()),
            reset_focus_event: Arc::new(OneShotEvent::new()),
        }
    }

    /// Live list of all items, refreshed after every mutation.
    pub fn todos(&self) -> &LiveList {
        &self.todos
    }

    /// Pending title for the next item; re-emitted so external changes
    /// (restored input state) stay in sync with the UI.
    pub fn new_todo_title(&self) -> &Arc<ObservableValue<String>> {
        &self.new_todo_title
    }

    /// One-shot "open this item" signal carrying the tapped id.
    pub fn navigate_to_todo(&self) -> &Arc<OneShotEvent<TodoId>> {
        &self.navigate_to_todo
    }

    /// One-shot human-readable error messages.
    pub fn error_event(&self) -> &Arc<OneShotEvent<String>> {
        &self.error_event
    }

    /// One-shot "clear input focus" signal after a successful add.
    pub fn reset_focus_event(&self) -> &Arc<OneShotEvent<()>> {
        &self.reset_focus_event
    }

    /// Updates the pending-title state with user input.
    pub fn set_new_todo_title(&self, title: impl Into<String>) {
        self.new_todo_title.set(title.into());
    }

    /// Adds a new item with the pending title.
    ///
    /// Blank input is rejected before any storage call. On successful insert
    /// the pending title resets and the focus-reset signal fires; an insert
    /// failure surfaces a generic error signal with the cause.
    pub fn add_todo(&self) {
        let title = self.new_todo_title.get();
        if TodoItem::validate_title(&title).is_err() {
            warn!("event=add_todo module=viewmodel status=rejected error_code=empty_title");
            self.error_event.set("The todo title cannot be empty.".to_string());
            return;
        }

        let new_todo_title = Arc::clone(&self.new_todo_title);
        let reset_focus_event = Arc::clone(&self.reset_focus_event);
        let error_event = Arc::clone(&self.error_event);
        self.store.insert(TodoItem::new(title), move |result| match result {
            Ok(_) => {
                new_todo_title.set(String::new());
                reset_focus_event.set(());
            }
            Err(err) => error_event.set(format!("Failed to add todo item: {err}")),
        });
    }

    /// Deletes every item; failure surfaces an error signal.
    pub fn delete_all_todos(&self) {
        let error_event = Arc::clone(&self.error_event);
        self.store.delete_all(move |result| {
            if let Err(err) = result {
                error_event.set(format!("Failed to delete all todo items: {err}"));
            }
        });
    }

    /// Returns a live list filtered to titles containing `query`.
    ///
    /// A store that can no longer accept the query surfaces an error signal
    /// and degrades to a static empty list instead of propagating.
    pub fn search_todos(&self, query: &str) -> LiveList {
        match self.store.search(query) {
            Ok(view) => view,
            Err(err) => {
                self.error_event
                    .set(format!("Failed to search todo items: {err}"));
                Arc::new(ObservableValue::new(Vec::new()))
            }
        }
    }

    /// Records a tap on an item by arming the navigate signal with its id.
    pub fn on_todo_item_clicked(&self, todo_id: TodoId) {
        self.navigate_to_todo.set(todo_id);
    }

    /// Disarms the navigate signal once navigation has happened.
    pub fn on_todo_item_navigated(&self) {
        self.navigate_to_todo.clear();
    }
}
