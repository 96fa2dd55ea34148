//! Domain model for roster entries, profile data and derived stats.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the persisted JSON document shape in one place.
//!
//! # Invariants
//! - Every entry is identified by a stable `EntryId`.
//! - `RosterStats` is derived data and never the source of truth.

pub mod entry;
pub mod profile;
pub mod stats;
