//! Profile, challenge and onboarding use-cases.
//!
//! # Responsibility
//! - Hold the profile document, challenge list and onboarding flag.
//! - Expose the last persisted roster stats for profile screens.
//! - Provide the developer reset that clears every stored document.

use crate::model::profile::{Challenge, ProfilePatch, UserProfile};
use crate::model::stats::RosterStats;
use crate::repo::document_store::{DocumentStore, StorageSnapshot};
use crate::repo::kv_repo::KeyValueRepository;
use crate::service::{ServiceError, ServiceResult};
use chrono::Utc;
use log::info;
use uuid::Uuid;

/// State container for non-roster app data.
pub struct ProfileService<R: KeyValueRepository> {
    store: DocumentStore<R>,
    profile: Option<UserProfile>,
    challenges: Vec<Challenge>,
    stats: Option<RosterStats>,
    onboarding_completed: bool,
}

impl<R: KeyValueRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self {
            store: DocumentStore::new(repo),
            profile: None,
            challenges: Vec::new(),
            stats: None,
            onboarding_completed: false,
        }
    }

    /// Reads profile, challenges, stats and the onboarding flag.
    pub fn load(&mut self) -> ServiceResult<()> {
        self.profile = self.store.get_profile()?;
        self.challenges = self.store.get_challenges()?;
        self.stats = self.store.get_stats()?;
        self.onboarding_completed = self.store.get_onboarding_completed()?;
        Ok(())
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn stats(&self) -> Option<&RosterStats> {
        self.stats.as_ref()
    }

    pub fn has_onboarded(&self) -> bool {
        self.onboarding_completed
    }

    /// Re-reads the stats document written by the roster service.
    pub fn reload_stats(&mut self) -> ServiceResult<Option<&RosterStats>> {
        self.stats = self.store.get_stats()?;
        Ok(self.stats.as_ref())
    }

    pub fn save_profile(&mut self, profile: UserProfile) -> ServiceResult<()> {
        self.store.save_profile(&profile)?;
        self.profile = Some(profile);
        Ok(())
    }

    /// Merges `patch` into the current profile.
    ///
    /// Returns `Ok(None)` without writing when no profile exists yet.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> ServiceResult<Option<&UserProfile>> {
        let Some(current) = self.profile.as_ref() else {
            return Ok(None);
        };
        let mut updated = current.clone();
        updated.apply_patch(patch);
        self.save_profile(updated)?;
        Ok(self.profile.as_ref())
    }

    /// Appends a new, not yet completed challenge.
    pub fn add_challenge(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> ServiceResult<Challenge> {
        let challenge = Challenge {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        let mut next = self.challenges.clone();
        next.push(challenge.clone());
        self.commit_challenges(next)?;
        Ok(challenge)
    }

    /// Replaces the challenge with the same id.
    pub fn update_challenge(&mut self, challenge: Challenge) -> ServiceResult<()> {
        let index = self.challenge_position(&challenge.id)?;
        let mut next = self.challenges.clone();
        next[index] = challenge;
        self.commit_challenges(next)
    }

    pub fn complete_challenge(&mut self, id: &str) -> ServiceResult<Challenge> {
        let index = self.challenge_position(id)?;
        let mut next = self.challenges.clone();
        next[index].complete(Utc::now());
        let completed = next[index].clone();
        self.commit_challenges(next)?;
        info!("event=challenge_complete module=service status=ok");
        Ok(completed)
    }

    pub fn complete_onboarding(&mut self) -> ServiceResult<()> {
        self.store.save_onboarding_completed(true)?;
        self.onboarding_completed = true;
        info!("event=onboarding_complete module=service status=ok");
        Ok(())
    }

    pub fn reset_onboarding(&mut self) -> ServiceResult<()> {
        self.store.save_onboarding_completed(false)?;
        self.onboarding_completed = false;
        Ok(())
    }

    pub fn storage_snapshot(&self) -> ServiceResult<StorageSnapshot> {
        Ok(self.store.storage_snapshot()?)
    }

    /// Removes every stored document and resets in-memory state.
    pub fn clear_all(&mut self) -> ServiceResult<usize> {
        let removed = self.store.clear_all()?;
        self.profile = None;
        self.challenges.clear();
        self.stats = None;
        self.onboarding_completed = false;
        Ok(removed)
    }

    fn challenge_position(&self, id: &str) -> ServiceResult<usize> {
        self.challenges
            .iter()
            .position(|challenge| challenge.id == id)
            .ok_or_else(|| ServiceError::ChallengeNotFound(id.to_string()))
    }

    fn commit_challenges(&mut self, next: Vec<Challenge>) -> ServiceResult<()> {
        self.store.save_challenges(&next)?;
        self.challenges = next;
        Ok(())
    }
}
