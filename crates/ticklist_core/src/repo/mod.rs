//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for to-do items.
//! - Isolate SQLite query details from store/state-holder orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`MissingId`, `InvalidData`) in
//!   addition to DB transport errors.
//! - Title validation is NOT a repository concern; it belongs to the state
//!   holders above.

pub mod todo_repo;
