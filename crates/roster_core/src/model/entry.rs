//! Roster entry domain model.
//!
//! # Responsibility
//! - Define the canonical record for one tracked person/relationship.
//! - Provide input/patch shapes used by create and update use-cases.
//!
//! # Invariants
//! - `id` is unique within a roster and never reassigned.
//! - Every rating value is within `1..=5`.
//! - `updated_at` is never earlier than `created_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque entry identifier.
///
/// Kept as a string so documents written by older clients keep their ids.
pub type EntryId = String;

/// Lowest accepted score for one rating category.
pub const RATING_MIN: u8 = 1;
/// Highest accepted score for one rating category.
pub const RATING_MAX: u8 = 5;

/// Validation failures for [`Entry::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    /// Entry id is empty (or whitespace only).
    EmptyId,
    /// A rating value sits outside `1..=5`.
    RatingOutOfRange { category: String, value: u8 },
    /// `updated_at` precedes `created_at`.
    UpdatedBeforeCreated,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "entry id must not be empty"),
            Self::RatingOutOfRange { category, value } => write!(
                f,
                "rating `{category}` is {value}; expected {RATING_MIN}..={RATING_MAX}"
            ),
            Self::UpdatedBeforeCreated => {
                write!(f, "entry updatedAt must not be earlier than createdAt")
            }
        }
    }
}

impl Error for EntryValidationError {}

/// One date-event associated with an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateEvent {
    pub id: String,
    #[serde(default)]
    pub location: String,
    /// Calendar date (`YYYY-MM-DD`) or a full ISO-8601 timestamp.
    pub date: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub rating: u8,
}

/// Canonical record for one tracked person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    /// Category key -> score. A missing key means "unrated".
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,
    #[serde(default)]
    pub dates: Vec<DateEvent>,
    #[serde(default)]
    pub notes: String,
    /// Free-text tags. Duplicates are allowed and counted as-is.
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub how_we_met: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Manual ordering slot. `None` ranks as 0 under custom sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

impl Entry {
    /// Builds an entry from creation input with a fresh id.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now`.
    pub fn create(input: NewEntry, now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), input, now)
    }

    /// Builds an entry from creation input with a caller-provided id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: impl Into<EntryId>, input: NewEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: input.name,
            emoji: input.emoji,
            ratings: input.ratings,
            dates: input.dates,
            notes: input.notes,
            flags: input.flags,
            how_we_met: input.how_we_met,
            age: input.age,
            height: input.height,
            created_at: now,
            updated_at: now,
            order: input.order,
        }
    }

    /// Checks record invariants before persistence.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.id.trim().is_empty() {
            return Err(EntryValidationError::EmptyId);
        }
        for (category, value) in &self.ratings {
            if !(RATING_MIN..=RATING_MAX).contains(value) {
                return Err(EntryValidationError::RatingOutOfRange {
                    category: category.clone(),
                    value: *value,
                });
            }
        }
        if self.updated_at < self.created_at {
            return Err(EntryValidationError::UpdatedBeforeCreated);
        }
        Ok(())
    }

    /// Mean of all rating values.
    ///
    /// An entry without ratings averages to `0.0` instead of `0/0`.
    pub fn average_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.ratings.values().map(|value| f64::from(*value)).sum();
        sum / self.ratings.len() as f64
    }

    /// Applies a partial update and bumps `updated_at`.
    ///
    /// `updated_at` is clamped to `created_at` when the clock runs behind.
    pub fn apply_patch(&mut self, patch: EntryPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(emoji) = patch.emoji {
            self.emoji = emoji;
        }
        if let Some(ratings) = patch.ratings {
            self.ratings = ratings;
        }
        if let Some(dates) = patch.dates {
            self.dates = dates;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(flags) = patch.flags {
            self.flags = flags;
        }
        if let Some(how_we_met) = patch.how_we_met {
            self.how_we_met = how_we_met;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// Creation input: an entry without id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEntry {
    pub name: String,
    pub emoji: String,
    pub ratings: BTreeMap<String, u8>,
    pub dates: Vec<DateEvent>,
    pub notes: String,
    pub flags: Vec<String>,
    pub how_we_met: String,
    pub age: Option<u32>,
    pub height: Option<String>,
    pub order: Option<i64>,
}

/// Partial update for an existing entry.
///
/// `None` leaves the field untouched. For optional fields the inner `Option`
/// is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    pub name: Option<String>,
    pub emoji: Option<String>,
    pub ratings: Option<BTreeMap<String, u8>>,
    pub dates: Option<Vec<DateEvent>>,
    pub notes: Option<String>,
    pub flags: Option<Vec<String>>,
    pub how_we_met: Option<String>,
    pub age: Option<Option<u32>>,
    pub height: Option<Option<String>>,
    pub order: Option<Option<i64>>,
}

#[cfg(test)]
mod tests {
    use super::{Entry, EntryPatch, EntryValidationError, NewEntry};
    use chrono::{Duration, TimeZone, Utc};

    fn base_entry() -> Entry {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        Entry::with_id("e1", NewEntry::default(), now)
    }

    #[test]
    fn average_rating_is_zero_without_ratings() {
        assert_eq!(base_entry().average_rating(), 0.0);
    }

    #[test]
    fn average_rating_is_arithmetic_mean() {
        let mut entry = base_entry();
        entry.ratings.insert("a".to_string(), 4);
        entry.ratings.insert("b".to_string(), 2);
        assert_eq!(entry.average_rating(), 3.0);
    }

    #[test]
    fn validate_rejects_out_of_range_rating() {
        let mut entry = base_entry();
        entry.ratings.insert("vibe".to_string(), 6);
        assert_eq!(
            entry.validate().unwrap_err(),
            EntryValidationError::RatingOutOfRange {
                category: "vibe".to_string(),
                value: 6
            }
        );
    }

    #[test]
    fn apply_patch_never_moves_updated_at_before_created_at() {
        let mut entry = base_entry();
        let earlier = entry.created_at - Duration::hours(1);
        entry.apply_patch(
            EntryPatch {
                name: Some("Sam".to_string()),
                order: Some(Some(3)),
                ..EntryPatch::default()
            },
            earlier,
        );
        assert_eq!(entry.name, "Sam");
        assert_eq!(entry.order, Some(3));
        assert_eq!(entry.updated_at, entry.created_at);
        assert!(entry.validate().is_ok());
    }
}
