//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Keep error semantics simple for early-stage UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Return values are envelopes with `ok`/`message` diagnostics.

use std::path::PathBuf;
use std::sync::OnceLock;
use ticklist_core::db::open_db;
use ticklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, now_epoch_ms,
    ping as ping_inner, RepoResult, SqliteTodoRepository, TodoItem, TodoRepository,
};

const ENTRY_DB_FILE_NAME: &str = "ticklist_entry.sqlite3";
static ENTRY_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// To-do item shape crossing the FFI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTodoItem {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    /// Unix epoch milliseconds; `None` while the item is open.
    pub completed_at: Option<i64>,
}

/// List response envelope for list/search flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResponse {
    /// Items in canonical list order (empty on failure).
    pub items: Vec<EntryTodoItem>,
    /// Human-readable response message for diagnostics.
    pub message: String,
}

/// Generic action response envelope for command flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Affected item id, when the operation targets one.
    pub todo_id: Option<i64>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl EntryActionResponse {
    fn success(message: impl Into<String>, todo_id: Option<i64>) -> Self {
        Self {
            ok: true,
            todo_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            todo_id: None,
            message: message.into(),
        }
    }
}

/// Adds a to-do item with the provided title.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Blank titles are rejected without touching storage.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_add_todo(title: String) -> EntryActionResponse {
    let title = title.trim().to_string();
    if TodoItem::validate_title(&title).is_err() {
        return EntryActionResponse::failure("The todo title cannot be empty.");
    }

    match with_todo_repo(|repo| repo.insert(&TodoItem::new(title))) {
        Ok(id) => EntryActionResponse::success("Todo created.", Some(id)),
        Err(err) => EntryActionResponse::failure(format!("entry_add_todo failed: {err}")),
    }
}

/// Lists all items in canonical order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list_todos() -> EntryListResponse {
    match with_todo_repo(|repo| repo.list_all()) {
        Ok(items) => to_list_response(items),
        Err(err) => EntryListResponse {
            items: Vec::new(),
            message: format!("entry_list_todos failed: {err}"),
        },
    }
}

/// Searches items whose title contains `query`, in canonical order.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; failures return an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_search_todos(query: String) -> EntryListResponse {
    match with_todo_repo(|repo| repo.search(query.trim())) {
        Ok(items) => to_list_response(items),
        Err(err) => EntryListResponse {
            items: Vec::new(),
            message: format!("entry_search_todos failed: {err}"),
        },
    }
}

/// Marks an item completed or open, settling its completion timestamp.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; a missing item is a failure envelope, not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_set_completed(todo_id: i64, completed: bool) -> EntryActionResponse {
    let result = with_todo_repo(|repo| {
        let Some(mut item) = repo.get_by_id(todo_id)? else {
            return Ok(None);
        };
        item.completed = completed;
        item.apply_completion_timestamp(now_epoch_ms());
        repo.update(&item)?;
        Ok(Some(todo_id))
    });

    match result {
        Ok(Some(id)) => EntryActionResponse::success("Todo updated.", Some(id)),
        Ok(None) => EntryActionResponse::failure("Todo item not found."),
        Err(err) => EntryActionResponse::failure(format!("entry_set_completed failed: {err}")),
    }
}

/// Deletes one item by id.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; deleting an absent id still succeeds.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete_todo(todo_id: i64) -> EntryActionResponse {
    match with_todo_repo(|repo| repo.delete(todo_id)) {
        Ok(()) => EntryActionResponse::success("Todo deleted.", Some(todo_id)),
        Err(err) => EntryActionResponse::failure(format!("entry_delete_todo failed: {err}")),
    }
}

/// Deletes every item.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_clear_todos() -> EntryActionResponse {
    match with_todo_repo(|repo| repo.delete_all()) {
        Ok(()) => EntryActionResponse::success("All todos deleted.", None),
        Err(err) => EntryActionResponse::failure(format!("entry_clear_todos failed: {err}")),
    }
}

fn resolve_entry_db_path() -> PathBuf {
    ENTRY_DB_PATH
        .get_or_init(|| std::env::temp_dir().join(ENTRY_DB_FILE_NAME))
        .clone()
}

fn open_entry_connection() -> Result<rusqlite::Connection, String> {
    open_db(resolve_entry_db_path()).map_err(|err| err.to_string())
}

fn with_todo_repo<T>(
    op: impl FnOnce(&SqliteTodoRepository<'_>) -> RepoResult<T>,
) -> Result<T, String> {
    let conn = open_entry_connection()?;
    let repo = SqliteTodoRepository::new(&conn);
    op(&repo).map_err(|err| err.to_string())
}

fn to_list_response(items: Vec<TodoItem>) -> EntryListResponse {
    let message = if items.is_empty() {
        "No todos.".to_string()
    } else {
        format!("Found {} todo(s).", items.len())
    };
    let items = items
        .into_iter()
        .filter_map(|item| {
            item.id.map(|id| EntryTodoItem {
                id,
                title: item.title,
                completed: item.completed,
                completed_at: item.completed_at,
            })
        })
        .collect();
    EntryListResponse { items, message }
}
