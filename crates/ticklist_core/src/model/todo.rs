//! To-do item domain model.
//!
//! # Responsibility
//! - Define the canonical record stored in `todos_table`.
//! - Provide lifecycle helpers for the completion-timestamp rule.
//!
//! # Invariants
//! - `id` is `None` until the item has been inserted; storage assigns it and
//!   it is never reused for another item while the row exists.
//! - `completed_at` is `Some` iff `completed` was `true` on the most recent
//!   save. Storage does not enforce this; callers apply
//!   [`TodoItem::apply_completion_timestamp`] before every update.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Stable identifier for a persisted to-do item.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
/// Values are SQLite rowids from `todos_table.id`.
pub type TodoId = i64;

/// Validation failure raised at the state-holder boundary.
///
/// Storage deliberately accepts any title; the rule lives above persistence
/// so direct repository callers (imports, tests) are not constrained by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "the todo title cannot be empty"),
        }
    }
}

impl Error for TodoValidationError {}

/// Canonical domain record for a single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Storage-assigned identity. `None` for items not yet inserted.
    pub id: Option<TodoId>,
    /// Short user-entered task text.
    pub title: String,
    /// Whether the task has been marked done.
    pub completed: bool,
    /// Unix epoch milliseconds of completion. Serialized as `completedAt`
    /// to match the external schema naming.
    #[serde(rename = "completedAt")]
    pub completed_at: Option<i64>,
}

impl TodoItem {
    /// Creates a fresh, not-yet-persisted item with lifecycle defaults.
    ///
    /// # Invariants
    /// - `id` starts as `None` and is assigned on insert.
    /// - `completed` starts `false`, `completed_at` starts `None`.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            completed: false,
            completed_at: None,
        }
    }

    /// Rejects empty or whitespace-only titles.
    pub fn validate_title(title: &str) -> Result<(), TodoValidationError> {
        if title.trim().is_empty() {
            return Err(TodoValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Applies the completion-timestamp rule ahead of a save.
    ///
    /// # Contract
    /// - `completed == true` -> `completed_at = Some(now_ms)`.
    /// - `completed == false` -> `completed_at = None`.
    pub fn apply_completion_timestamp(&mut self, now_ms: i64) {
        self.completed_at = if self.completed { Some(now_ms) } else { None };
    }

    /// Returns whether this item still needs doing.
    pub fn is_open(&self) -> bool {
        !self.completed
    }
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
