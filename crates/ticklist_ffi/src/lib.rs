//! Flutter-facing FFI crate for the Ticklist core.

pub mod api;
