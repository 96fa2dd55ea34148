//! Roster list projections.
//!
//! # Responsibility
//! - Derive the filtered, display-ordered entry list from stored order.

pub mod roster_view;
