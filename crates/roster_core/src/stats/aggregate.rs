//! Single-pass stats reducers over roster entries.
//!
//! # Invariants
//! - `compute_stats(&[])` equals `RosterStats::empty()`.
//! - Entries without ratings contribute an average of `0.0`.
//! - Flag ties resolve to the flag seen first in iteration order.
//! - Best entry ties resolve to the earliest entry.

use crate::model::entry::Entry;
use crate::model::stats::{BestEntry, RosterStats};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};

/// Computes summary statistics for the given roster snapshot.
pub fn compute_stats(entries: &[Entry]) -> RosterStats {
    if entries.is_empty() {
        return RosterStats::empty();
    }

    let averages: Vec<f64> = entries.iter().map(Entry::average_rating).collect();
    let average_rating = averages.iter().sum::<f64>() / averages.len() as f64;

    RosterStats {
        total_entries: u32::try_from(entries.len()).unwrap_or(u32::MAX),
        average_rating,
        most_common_flag: most_common_flag(entries),
        best_entry: best_entry(entries, &averages),
        ghosting_rate: 0.0,
        dates_by_month: dates_by_month(entries),
    }
}

/// Returns the flag with the highest occurrence count, or `""` without flags.
///
/// Every occurrence counts, including repeats inside one entry.
pub fn most_common_flag(entries: &[Entry]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();

    for flag in entries.iter().flat_map(|entry| entry.flags.iter()) {
        let count = counts.entry(flag.as_str()).or_insert_with(|| {
            first_seen.push(flag.as_str());
            0
        });
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for flag in first_seen {
        let count = counts.get(flag).copied().unwrap_or(0);
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((flag, count));
        }
    }

    best.map(|(flag, _)| flag.to_string()).unwrap_or_default()
}

fn best_entry(entries: &[Entry], averages: &[f64]) -> BestEntry {
    entries
        .iter()
        .zip(averages)
        .fold(BestEntry::default(), |best, (entry, rating)| {
            if *rating > best.rating {
                BestEntry {
                    name: entry.name.clone(),
                    rating: *rating,
                }
            } else {
                best
            }
        })
}

/// Counts date-events per `YYYY-MM` month across all entries.
///
/// Date strings that cannot be parsed are skipped.
pub fn dates_by_month(entries: &[Entry]) -> BTreeMap<String, u32> {
    let mut months = BTreeMap::new();
    for event in entries.iter().flat_map(|entry| entry.dates.iter()) {
        if let Some(month) = month_key(&event.date) {
            *months.entry(month).or_insert(0) += 1;
        }
    }
    months
}

/// Derives the `YYYY-MM` bucket for one date-event `date` value.
///
/// Full timestamps are bucketed by their UTC month; bare dates (optionally
/// followed by a time part) by their calendar month.
pub fn month_key(date: &str) -> Option<String> {
    let trimmed = date.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc).format("%Y-%m").to_string());
    }

    let day = trimmed.get(..10)?;
    let rest = &trimmed[10..];
    if !(rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        return None;
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|parsed| parsed.format("%Y-%m").to_string())
}
