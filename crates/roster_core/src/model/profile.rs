//! User profile and challenge models.
//!
//! # Responsibility
//! - Define the profile document kept alongside the roster.
//! - Define dating challenges and their completion lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base color scheme chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
}

/// Self-described dating style picked during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatingStyle {
    Casual,
    Serious,
    Exploring,
}

/// Rating categories offered to a newly onboarded user.
pub const DEFAULT_RATING_CATEGORIES: &[&str] = &[
    "vibe",
    "humor",
    "communication",
    "chemistry",
    "consistency",
    "hotness",
    "style",
    "greenFlags",
    "redFlags",
    "ghostingRisk",
];

/// Badge assigned to a brand-new profile.
pub const DEFAULT_BADGE: &str = "Newbie";

/// Profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub avatar: String,
    pub theme: ThemeMode,
    pub dating_style: DatingStyle,
    pub badge: String,
    pub selected_ratings: Vec<String>,
    pub has_onboarded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<String>,
}

impl UserProfile {
    /// Creates a fresh profile with the default badge and rating categories.
    pub fn new(avatar: impl Into<String>, dating_style: DatingStyle) -> Self {
        Self {
            avatar: avatar.into(),
            theme: ThemeMode::Light,
            dating_style,
            badge: DEFAULT_BADGE.to_string(),
            selected_ratings: DEFAULT_RATING_CATEGORIES
                .iter()
                .map(|category| (*category).to_string())
                .collect(),
            has_onboarded: false,
            custom_theme: None,
        }
    }

    /// Merges a partial update into this profile.
    pub fn apply_patch(&mut self, patch: ProfilePatch) {
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(dating_style) = patch.dating_style {
            self.dating_style = dating_style;
        }
        if let Some(badge) = patch.badge {
            self.badge = badge;
        }
        if let Some(selected_ratings) = patch.selected_ratings {
            self.selected_ratings = selected_ratings;
        }
        if let Some(has_onboarded) = patch.has_onboarded {
            self.has_onboarded = has_onboarded;
        }
        if let Some(custom_theme) = patch.custom_theme {
            self.custom_theme = custom_theme;
        }
    }
}

/// Partial profile update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub avatar: Option<String>,
    pub theme: Option<ThemeMode>,
    pub dating_style: Option<DatingStyle>,
    pub badge: Option<String>,
    pub selected_ratings: Option<Vec<String>>,
    pub has_onboarded: Option<bool>,
    pub custom_theme: Option<Option<String>>,
}

/// A dating challenge the user can complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Challenge {
    /// Marks the challenge completed. Completing twice keeps the first time.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        if self.completed {
            return;
        }
        self.completed = true;
        self.completed_at = Some(now);
    }
}
