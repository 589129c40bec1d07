//! Asynchronous store coordinating persistence and live query views.
//!
//! # Responsibility
//! - Execute every mutation off the caller's thread, on a dedicated worker
//!   owning the SQLite connection.
//! - Keep registered live views current by re-running their queries after
//!   each successful mutation.
//!
//! # Invariants
//! - Callers never block: commands are fire-and-forget, results arrive via
//!   completion callbacks and observable views.
//! - Live views are held weakly; dropping the last external reference
//!   unregisters the view.

pub mod todo_store;
