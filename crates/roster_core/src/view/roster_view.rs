//! Search filter and sort projection for roster list display.
//!
//! # Invariants
//! - The input slice is never mutated; projections are fresh vectors.
//! - Sorting is stable: entries with equal keys keep their input order.
//! - Unknown sort keys leave the filtered order untouched.

use crate::model::entry::Entry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Display ordering strategy for the roster list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// User-controlled drag-and-drop order.
    #[default]
    Custom,
    DateNewest,
    DateOldest,
    RatingHighest,
    RatingLowest,
    NameAz,
    NameZa,
}

impl SortMode {
    /// Every mode in menu order.
    pub const ALL: [SortMode; 7] = [
        SortMode::Custom,
        SortMode::DateNewest,
        SortMode::DateOldest,
        SortMode::RatingHighest,
        SortMode::RatingLowest,
        SortMode::NameAz,
        SortMode::NameZa,
    ];

    /// Parses a stable sort key such as `name_az`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "custom" => Some(Self::Custom),
            "date_newest" => Some(Self::DateNewest),
            "date_oldest" => Some(Self::DateOldest),
            "rating_highest" => Some(Self::RatingHighest),
            "rating_lowest" => Some(Self::RatingLowest),
            "name_az" => Some(Self::NameAz),
            "name_za" => Some(Self::NameZa),
            _ => None,
        }
    }

    pub fn as_key(self) -> &'static str {
        match self {
            Self::Custom => "custom",
            Self::DateNewest => "date_newest",
            Self::DateOldest => "date_oldest",
            Self::RatingHighest => "rating_highest",
            Self::RatingLowest => "rating_lowest",
            Self::NameAz => "name_az",
            Self::NameZa => "name_za",
        }
    }

    /// Human-readable menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Custom => "Custom Order",
            Self::DateNewest => "Newest First",
            Self::DateOldest => "Oldest First",
            Self::RatingHighest => "Highest Rated",
            Self::RatingLowest => "Lowest Rated",
            Self::NameAz => "Name (A-Z)",
            Self::NameZa => "Name (Z-A)",
        }
    }

    fn compare(self, a: &Entry, b: &Entry) -> Ordering {
        match self {
            Self::Custom => a.order.unwrap_or(0).cmp(&b.order.unwrap_or(0)),
            Self::DateNewest => b.created_at.cmp(&a.created_at),
            Self::DateOldest => a.created_at.cmp(&b.created_at),
            Self::RatingHighest => b.average_rating().total_cmp(&a.average_rating()),
            Self::RatingLowest => a.average_rating().total_cmp(&b.average_rating()),
            Self::NameAz => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::NameZa => b.name.to_lowercase().cmp(&a.name.to_lowercase()),
        }
    }
}

/// Returns whether an entry matches the free-text search.
///
/// Empty search matches everything. Name and notes match case-insensitively;
/// emoji is a raw substring test against the unfolded search text.
pub fn matches_search(entry: &Entry, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }
    let needle = search_text.to_lowercase();
    entry.name.to_lowercase().contains(&needle)
        || entry.notes.to_lowercase().contains(&needle)
        || entry.emoji.contains(search_text)
}

/// Filters by search text and orders by `sort_mode`.
pub fn project(entries: &[Entry], search_text: &str, sort_mode: SortMode) -> Vec<Entry> {
    let mut projected = filter_entries(entries, search_text);
    projected.sort_by(|a, b| sort_mode.compare(a, b));
    projected
}

/// Like [`project`] but takes a raw sort key from the UI layer.
///
/// Unknown keys keep the filtered entries in their stored order.
pub fn project_by_key(entries: &[Entry], search_text: &str, sort_key: &str) -> Vec<Entry> {
    match SortMode::from_key(sort_key) {
        Some(sort_mode) => project(entries, search_text, sort_mode),
        None => filter_entries(entries, search_text),
    }
}

fn filter_entries(entries: &[Entry], search_text: &str) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| matches_search(entry, search_text))
        .cloned()
        .collect()
}
