//! Flutter-facing FFI crate for the Roster core.

pub mod api;
