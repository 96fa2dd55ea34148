//! Typed whole-document storage over a key-value repository.
//!
//! # Responsibility
//! - Map fixed storage keys to JSON documents (roster, profile, challenges,
//!   stats, onboarding flag).
//! - Decode documents into domain types and reject corrupt state.
//!
//! # Invariants
//! - Documents are always read and written whole.
//! - A missing document reads as its default, a corrupt one as an error.
//! - Roster entries are validated on both read and write paths.

use crate::model::entry::Entry;
use crate::model::profile::{Challenge, UserProfile};
use crate::model::stats::RosterStats;
use crate::repo::kv_repo::{KeyValueRepository, RepoError, RepoResult};
use log::{debug, error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Fixed document keys used by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Roster,
    UserProfile,
    Challenges,
    Stats,
    OnboardingCompleted,
}

impl StorageKey {
    pub const ALL: [StorageKey; 5] = [
        StorageKey::Roster,
        StorageKey::UserProfile,
        StorageKey::Challenges,
        StorageKey::Stats,
        StorageKey::OnboardingCompleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roster => "@roster/roster",
            Self::UserProfile => "@roster/user_profile",
            Self::Challenges => "@roster/challenges",
            Self::Stats => "@roster/stats",
            Self::OnboardingCompleted => "@roster/onboarding_completed",
        }
    }
}

/// Every document decoded at once, for diagnostics screens.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSnapshot {
    pub roster: Vec<Entry>,
    pub profile: Option<UserProfile>,
    pub challenges: Vec<Challenge>,
    pub stats: Option<RosterStats>,
    pub onboarding_completed: bool,
}

/// Document-level facade over a [`KeyValueRepository`].
pub struct DocumentStore<R: KeyValueRepository> {
    repo: R,
}

impl<R: KeyValueRepository> DocumentStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn get_roster(&self) -> RepoResult<Vec<Entry>> {
        let entries: Vec<Entry> = self.read(StorageKey::Roster)?.unwrap_or_default();
        for entry in &entries {
            entry.validate().map_err(|err| {
                RepoError::InvalidData(format!("entry `{}` in roster: {err}", entry.id))
            })?;
        }
        Ok(entries)
    }

    /// Replaces the roster document and verifies the write by reading back.
    pub fn save_roster(&self, entries: &[Entry]) -> RepoResult<()> {
        for entry in entries {
            entry.validate()?;
        }

        let key = StorageKey::Roster;
        let json = encode(key, entries)?;
        if let Err(err) = self.repo.set_item(key.as_str(), &json) {
            error!(
                "event=roster_save module=repo status=error entries={} error={}",
                entries.len(),
                err
            );
            return Err(err);
        }
        if self.repo.get_item(key.as_str())?.is_none() {
            error!("event=roster_save module=repo status=error error_code=verify_failed");
            return Err(RepoError::VerifyFailed(key.as_str()));
        }

        debug!(
            "event=roster_save module=repo status=ok entries={} bytes={}",
            entries.len(),
            json.len()
        );
        Ok(())
    }

    pub fn get_profile(&self) -> RepoResult<Option<UserProfile>> {
        self.read(StorageKey::UserProfile)
    }

    pub fn save_profile(&self, profile: &UserProfile) -> RepoResult<()> {
        self.write(StorageKey::UserProfile, profile)
    }

    pub fn get_challenges(&self) -> RepoResult<Vec<Challenge>> {
        Ok(self.read(StorageKey::Challenges)?.unwrap_or_default())
    }

    pub fn save_challenges(&self, challenges: &[Challenge]) -> RepoResult<()> {
        self.write(StorageKey::Challenges, challenges)
    }

    pub fn get_stats(&self) -> RepoResult<Option<RosterStats>> {
        self.read(StorageKey::Stats)
    }

    pub fn save_stats(&self, stats: &RosterStats) -> RepoResult<()> {
        self.write(StorageKey::Stats, stats)
    }

    pub fn get_onboarding_completed(&self) -> RepoResult<bool> {
        Ok(self.read(StorageKey::OnboardingCompleted)?.unwrap_or(false))
    }

    pub fn save_onboarding_completed(&self, completed: bool) -> RepoResult<()> {
        self.write(StorageKey::OnboardingCompleted, &completed)
    }

    /// Decodes every document.
    pub fn storage_snapshot(&self) -> RepoResult<StorageSnapshot> {
        Ok(StorageSnapshot {
            roster: self.get_roster()?,
            profile: self.get_profile()?,
            challenges: self.get_challenges()?,
            stats: self.get_stats()?,
            onboarding_completed: self.get_onboarding_completed()?,
        })
    }

    /// Removes every app document. Returns how many existed.
    pub fn clear_all(&self) -> RepoResult<usize> {
        let keys = StorageKey::ALL.map(StorageKey::as_str);
        let removed = self.repo.remove_items(&keys)?;
        info!("event=storage_clear module=repo status=ok removed={removed}");
        Ok(removed)
    }

    fn read<T: DeserializeOwned>(&self, key: StorageKey) -> RepoResult<Option<T>> {
        let Some(raw) = self.repo.get_item(key.as_str())? else {
            return Ok(None);
        };
        serde_json::from_str(&raw).map(Some).map_err(|err| {
            error!(
                "event=document_read module=repo status=error key={} error_code=decode_failed",
                key.as_str()
            );
            RepoError::InvalidData(format!("document `{}`: {err}", key.as_str()))
        })
    }

    fn write<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> RepoResult<()> {
        let json = encode(key, value)?;
        self.repo.set_item(key.as_str(), &json)
    }
}

fn encode<T: Serialize + ?Sized>(key: StorageKey, value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|source| RepoError::Encode {
        key: key.as_str(),
        source,
    })
}
