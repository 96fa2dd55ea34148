//! Roster statistics aggregation.
//!
//! # Responsibility
//! - Reduce an entry collection into one `RosterStats` summary.
//!
//! # Invariants
//! - Aggregation is pure: no I/O, no hidden state.

pub mod aggregate;
