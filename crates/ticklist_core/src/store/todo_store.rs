//! To-do store worker and its handle.
//!
//! # Responsibility
//! - Own the database connection on a single worker thread.
//! - Translate handle calls into queued commands and completion callbacks.
//! - Publish query results into [`ObservableValue`]-backed live views.
//!
//! # Invariants
//! - All repository access happens on the worker thread.
//! - A failed mutation invokes its completion with the error and leaves the
//!   live views untouched.
//! - Completion callbacks and view notifications run on the worker thread;
//!   embedders marshal to their UI context.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::todo::{TodoId, TodoItem};
use crate::observe::ObservableValue;
use crate::repo::todo_repo::{RepoError, SqliteTodoRepository, TodoRepository};
use log::{error, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, SendError, Sender};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;

/// Live, self-refreshing list query result.
pub type LiveList = Arc<ObservableValue<Vec<TodoItem>>>;

/// Live, self-refreshing single-item query result.
pub type LiveItem = Arc<ObservableValue<Option<TodoItem>>>;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error surfaced to callers and completion callbacks.
#[derive(Debug)]
pub enum StoreError {
    /// Opening or bootstrapping the database failed.
    Db(DbError),
    /// The operation failed inside the persistence layer.
    Repo(RepoError),
    /// Starting the worker thread failed.
    Spawn(std::io::Error),
    /// The worker thread is gone; no further operations will run.
    Disconnected,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Spawn(err) => write!(f, "failed to start store worker: {err}"),
            Self::Disconnected => write!(f, "todo store worker is no longer running"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Spawn(err) => Some(err),
            Self::Disconnected => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

type Completion<T> = Box<dyn FnOnce(StoreResult<T>) + Send>;

enum Command {
    Insert {
        item: TodoItem,
        done: Completion<TodoId>,
    },
    Update {
        item: TodoItem,
        done: Completion<()>,
    },
    Delete {
        id: TodoId,
        done: Completion<()>,
    },
    DeleteAll {
        done: Completion<()>,
    },
    WatchAll {
        view: Weak<ObservableValue<Vec<TodoItem>>>,
    },
    WatchSearch {
        pattern: String,
        view: Weak<ObservableValue<Vec<TodoItem>>>,
    },
    WatchItem {
        id: TodoId,
        view: Weak<ObservableValue<Option<TodoItem>>>,
    },
    Shutdown,
}

/// Owns the worker thread; dropping it drains and stops the worker.
pub struct TodoStore {
    sender: Sender<Command>,
    worker: Option<JoinHandle<()>>,
}

impl TodoStore {
    /// Opens a file-backed store and starts its worker thread.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = open_db(path)?;
        Self::start(conn)
    }

    /// Opens an in-memory store. The data lives as long as the store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Self::start(conn)
    }

    fn start(conn: Connection) -> StoreResult<Self> {
        let (sender, receiver) = channel();
        let worker = std::thread::Builder::new()
            .name("ticklist-store".to_string())
            .spawn(move || Worker::new(conn, receiver).run())
            .map_err(StoreError::Spawn)?;

        info!("event=store_start module=store status=ok");
        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    /// Returns a cloneable handle for dispatching operations.
    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            sender: self.sender.clone(),
        }
    }
}

impl Drop for TodoStore {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
        info!("event=store_stop module=store status=ok");
    }
}

/// Cheap, cloneable front door to the store worker.
///
/// Every method returns immediately; persistence outcomes arrive through the
/// provided completion callback, on the worker thread.
#[derive(Clone)]
pub struct StoreHandle {
    sender: Sender<Command>,
}

impl StoreHandle {
    /// Inserts (upsert by id) and reports the assigned id to `done`.
    pub fn insert(&self, item: TodoItem, done: impl FnOnce(StoreResult<TodoId>) + Send + 'static) {
        self.dispatch(Command::Insert {
            item,
            done: Box::new(done),
        });
    }

    /// Overwrites the row matching `item.id`; absent rows are a no-op.
    pub fn update(&self, item: TodoItem, done: impl FnOnce(StoreResult<()>) + Send + 'static) {
        self.dispatch(Command::Update {
            item,
            done: Box::new(done),
        });
    }

    /// Deletes the row matching `id`; absent rows are a no-op.
    pub fn delete(&self, id: TodoId, done: impl FnOnce(StoreResult<()>) + Send + 'static) {
        self.dispatch(Command::Delete {
            id,
            done: Box::new(done),
        });
    }

    /// Empties the table.
    pub fn delete_all(&self, done: impl FnOnce(StoreResult<()>) + Send + 'static) {
        self.dispatch(Command::DeleteAll {
            done: Box::new(done),
        });
    }

    /// Live view over all items in canonical order.
    ///
    /// Starts empty and is filled by the worker; when the worker is gone the
    /// view stays empty forever (the failure is logged, screens degrade to an
    /// empty list rather than an error).
    pub fn get_all(&self) -> LiveList {
        let view: LiveList = Arc::new(ObservableValue::new(Vec::new()));
        self.dispatch(Command::WatchAll {
            view: Arc::downgrade(&view),
        });
        view
    }

    /// Live view over a single item; `None` until loaded or when absent.
    pub fn get_by_id(&self, id: TodoId) -> LiveItem {
        let view: LiveItem = Arc::new(ObservableValue::new(None));
        self.dispatch(Command::WatchItem {
            id,
            view: Arc::downgrade(&view),
        });
        view
    }

    /// Live view over items whose title contains `pattern`.
    ///
    /// Unlike [`StoreHandle::get_all`] this reports a dead worker to the
    /// caller, which degrades to a static empty list.
    pub fn search(&self, pattern: &str) -> StoreResult<LiveList> {
        let view: LiveList = Arc::new(ObservableValue::new(Vec::new()));
        let accepted = self.dispatch(Command::WatchSearch {
            pattern: pattern.to_string(),
            view: Arc::downgrade(&view),
        });
        if accepted {
            Ok(view)
        } else {
            Err(StoreError::Disconnected)
        }
    }

    fn dispatch(&self, command: Command) -> bool {
        match self.sender.send(command) {
            Ok(()) => true,
            Err(SendError(returned)) => {
                warn!("event=store_dispatch module=store status=error error_code=worker_gone");
                fail_command(returned);
                false
            }
        }
    }
}

/// Invokes a rejected command's completion so callers always hear back.
fn fail_command(command: Command) {
    match command {
        Command::Insert { done, .. } => done(Err(StoreError::Disconnected)),
        Command::Update { done, .. } => done(Err(StoreError::Disconnected)),
        Command::Delete { done, .. } => done(Err(StoreError::Disconnected)),
        Command::DeleteAll { done } => done(Err(StoreError::Disconnected)),
        Command::WatchAll { .. }
        | Command::WatchSearch { .. }
        | Command::WatchItem { .. }
        | Command::Shutdown => {}
    }
}

struct ListView {
    /// `None` is the unfiltered list; `Some` is a title substring filter.
    filter: Option<String>,
    view: Weak<ObservableValue<Vec<TodoItem>>>,
}

struct ItemView {
    id: TodoId,
    view: Weak<ObservableValue<Option<TodoItem>>>,
}

struct Worker {
    conn: Connection,
    receiver: Receiver<Command>,
    list_views: Vec<ListView>,
    item_views: Vec<ItemView>,
}

impl Worker {
    fn new(conn: Connection, receiver: Receiver<Command>) -> Self {
        Self {
            conn,
            receiver,
            list_views: Vec::new(),
            item_views: Vec::new(),
        }
    }

    fn run(mut self) {
        while let Ok(command) = self.receiver.recv() {
            match command {
                Command::Insert { item, done } => {
                    let result = SqliteTodoRepository::new(&self.conn)
                        .insert(&item)
                        .map_err(StoreError::from);
                    let changed = result.is_ok();
                    done(result);
                    if changed {
                        self.refresh_views();
                    }
                }
                Command::Update { item, done } => {
                    let result = SqliteTodoRepository::new(&self.conn)
                        .update(&item)
                        .map_err(StoreError::from);
                    let changed = result.is_ok();
                    done(result);
                    if changed {
                        self.refresh_views();
                    }
                }
                Command::Delete { id, done } => {
                    let result = SqliteTodoRepository::new(&self.conn)
                        .delete(id)
                        .map_err(StoreError::from);
                    let changed = result.is_ok();
                    done(result);
                    if changed {
                        self.refresh_views();
                    }
                }
                Command::DeleteAll { done } => {
                    let result = SqliteTodoRepository::new(&self.conn)
                        .delete_all()
                        .map_err(StoreError::from);
                    let changed = result.is_ok();
                    done(result);
                    if changed {
                        self.refresh_views();
                    }
                }
                Command::WatchAll { view } => {
                    let registration = ListView { filter: None, view };
                    self.fill_list_view(&registration);
                    self.list_views.push(registration);
                }
                Command::WatchSearch { pattern, view } => {
                    let registration = ListView {
                        filter: Some(pattern),
                        view,
                    };
                    self.fill_list_view(&registration);
                    self.list_views.push(registration);
                }
                Command::WatchItem { id, view } => {
                    let registration = ItemView { id, view };
                    self.fill_item_view(&registration);
                    self.item_views.push(registration);
                }
                Command::Shutdown => break,
            }
        }
    }

    fn fill_list_view(&self, registration: &ListView) {
        let Some(view) = registration.view.upgrade() else {
            return;
        };
        let repo = SqliteTodoRepository::new(&self.conn);
        let result = match &registration.filter {
            None => repo.list_all(),
            Some(pattern) => repo.search(pattern),
        };
        match result {
            Ok(items) => view.set(items),
            Err(err) => error!(
                "event=live_query module=store status=error query=list error={err}"
            ),
        }
    }

    fn fill_item_view(&self, registration: &ItemView) {
        let Some(view) = registration.view.upgrade() else {
            return;
        };
        match SqliteTodoRepository::new(&self.conn).get_by_id(registration.id) {
            Ok(item) => view.set(item),
            Err(err) => error!(
                "event=live_query module=store status=error query=item id={} error={err}",
                registration.id
            ),
        }
    }

    /// Re-runs every registered query and publishes fresh results, pruning
    /// views whose last external reference has been dropped.
    fn refresh_views(&mut self) {
        self.list_views
            .retain(|registration| registration.view.strong_count() > 0);
        self.item_views
            .retain(|registration| registration.view.strong_count() > 0);

        for registration in &self.list_views {
            self.fill_list_view(registration);
        }
        for registration in &self.item_views {
            self.fill_item_view(registration);
        }
    }
}
