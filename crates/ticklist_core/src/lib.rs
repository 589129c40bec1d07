//! Core domain logic for Ticklist, a local single-screen to-do list.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod observe;
pub mod repo;
pub mod store;
pub mod viewmodel;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{now_epoch_ms, TodoId, TodoItem, TodoValidationError};
pub use observe::{ObservableValue, OneShotEvent, SubscriptionId};
pub use repo::todo_repo::{RepoError, RepoResult, SqliteTodoRepository, TodoRepository};
pub use store::todo_store::{LiveItem, LiveList, StoreError, StoreHandle, StoreResult, TodoStore};
pub use viewmodel::edit_todo::EditTodoViewModel;
pub use viewmodel::todo_list::TodoListViewModel;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
