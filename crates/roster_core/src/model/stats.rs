//! Derived roster statistics.
//!
//! # Invariants
//! - `RosterStats` is a recomputable cache of the entry collection and is
//!   always replaced whole, never patched field by field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best-rated entry captured by name and average rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestEntry {
    pub name: String,
    pub rating: f64,
}

/// Summary statistics over all roster entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterStats {
    pub total_entries: u32,
    pub average_rating: f64,
    pub most_common_flag: String,
    pub best_entry: BestEntry,
    /// Reserved; always `0.0` until activity tracking exists.
    pub ghosting_rate: f64,
    /// `YYYY-MM` -> number of date-events in that month.
    pub dates_by_month: BTreeMap<String, u32>,
}

impl RosterStats {
    /// Stats for an empty roster.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Month buckets ordered newest month first.
    pub fn months_newest_first(&self) -> Vec<(String, u32)> {
        self.dates_by_month
            .iter()
            .rev()
            .map(|(month, count)| (month.clone(), *count))
            .collect()
    }
}
