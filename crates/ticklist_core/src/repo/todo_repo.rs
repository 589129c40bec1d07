//! To-do repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and query APIs over `todos_table`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - List and search results use the canonical ordering: open items before
//!   completed ones, then `completedAt` descending, then `id` descending.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Updating or deleting an absent row is a silent no-op; callers that care
//!   about existence read through `get_by_id` first.

use crate::db::DbError;
use crate::model::todo::{TodoId, TodoItem};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT id, title, completed, completedAt FROM todos_table";

const LIST_ORDER_SQL: &str = "ORDER BY completed ASC, completedAt DESC, id DESC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for to-do persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Write operation received an item that was never inserted.
    MissingId,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingId => write!(f, "todo item has no id; insert it first"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::MissingId => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for to-do CRUD and query operations.
pub trait TodoRepository {
    /// Inserts the item, replacing any existing row with the same id.
    /// Returns the storage-assigned id.
    fn insert(&self, item: &TodoItem) -> RepoResult<TodoId>;
    /// Overwrites the row matching `item.id`. Absent rows are a no-op.
    fn update(&self, item: &TodoItem) -> RepoResult<()>;
    /// Removes the row matching `id`. Absent rows are a no-op.
    fn delete(&self, id: TodoId) -> RepoResult<()>;
    /// Empties the table.
    fn delete_all(&self) -> RepoResult<()>;
    /// Point read by id.
    fn get_by_id(&self, id: TodoId) -> RepoResult<Option<TodoItem>>;
    /// All items in canonical list order.
    fn list_all(&self) -> RepoResult<Vec<TodoItem>>;
    /// Items whose title contains `pattern`, in canonical list order.
    fn search(&self, pattern: &str) -> RepoResult<Vec<TodoItem>>;
}

/// SQLite-backed to-do repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert(&self, item: &TodoItem) -> RepoResult<TodoId> {
        // INSERT OR REPLACE keeps upsert semantics: a caller-provided id
        // overwrites the conflicting row, a NULL id lets SQLite assign one.
        self.conn.execute(
            "INSERT OR REPLACE INTO todos_table (id, title, completed, completedAt)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                item.id,
                item.title.as_str(),
                bool_to_int(item.completed),
                item.completed_at,
            ],
        )?;

        let id = match item.id {
            Some(id) => id,
            None => self.conn.last_insert_rowid(),
        };
        debug!("event=todo_insert module=repo status=ok id={id}");
        Ok(id)
    }

    fn update(&self, item: &TodoItem) -> RepoResult<()> {
        let id = item.id.ok_or(RepoError::MissingId)?;

        let changed = self.conn.execute(
            "UPDATE todos_table
             SET title = ?1, completed = ?2, completedAt = ?3
             WHERE id = ?4;",
            params![
                item.title.as_str(),
                bool_to_int(item.completed),
                item.completed_at,
                id,
            ],
        )?;

        debug!("event=todo_update module=repo status=ok id={id} changed={changed}");
        Ok(())
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM todos_table WHERE id = ?1;", [id])?;
        debug!("event=todo_delete module=repo status=ok id={id} changed={changed}");
        Ok(())
    }

    fn delete_all(&self) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM todos_table;", [])?;
        debug!("event=todo_delete_all module=repo status=ok changed={changed}");
        Ok(())
    }

    fn get_by_id(&self, id: TodoId) -> RepoResult<Option<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn list_all(&self) -> RepoResult<Vec<TodoItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} {LIST_ORDER_SQL};"))?;

        let mut rows = stmt.query([])?;
        collect_todo_rows(&mut rows)
    }

    fn search(&self, pattern: &str) -> RepoResult<Vec<TodoItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} WHERE title LIKE ?1 {LIST_ORDER_SQL};"
        ))?;

        let like = format!("%{pattern}%");
        let mut rows = stmt.query([like])?;
        collect_todo_rows(&mut rows)
    }
}

fn collect_todo_rows(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<TodoItem>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_todo_row(row)?);
    }
    Ok(items)
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<TodoItem> {
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos_table.completed"
            )));
        }
    };

    Ok(TodoItem {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        completed,
        completed_at: row.get("completedAt")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
