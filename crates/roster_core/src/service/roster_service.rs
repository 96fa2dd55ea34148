//! Roster use-case service.
//!
//! # Responsibility
//! - Hold the canonical entry collection for the running app.
//! - Provide add/update/delete/reorder use-cases with whole-roster saves.
//! - Recompute and persist stats after every committed mutation.
//!
//! # Invariants
//! - The roster document is saved before in-memory entries change.
//! - A failed stats save is logged and never fails the mutation.
//! - Cached stats always equal `compute_stats(entries)`.

use crate::model::entry::{Entry, EntryId, EntryPatch, NewEntry};
use crate::model::stats::RosterStats;
use crate::repo::document_store::DocumentStore;
use crate::repo::kv_repo::KeyValueRepository;
use crate::service::{ServiceError, ServiceResult};
use crate::stats::aggregate::compute_stats;
use crate::view::roster_view::{project, project_by_key, SortMode};
use chrono::Utc;
use log::{info, warn};

/// Single logical owner of the roster collection.
pub struct RosterService<R: KeyValueRepository> {
    store: DocumentStore<R>,
    entries: Vec<Entry>,
    stats: RosterStats,
}

impl<R: KeyValueRepository> RosterService<R> {
    /// Creates a service with an empty roster. Call [`Self::load`] to read
    /// persisted state.
    pub fn new(repo: R) -> Self {
        Self {
            store: DocumentStore::new(repo),
            entries: Vec::new(),
            stats: RosterStats::empty(),
        }
    }

    /// Loads the persisted roster and reconciles the stats cache with it.
    pub fn load(&mut self) -> ServiceResult<()> {
        self.entries = self.store.get_roster()?;
        let recomputed = compute_stats(&self.entries);

        let cached = match self.store.get_stats() {
            Ok(cached) => cached,
            Err(_) => {
                // Decode errors may quote document text; log the code only.
                warn!("event=roster_load module=service status=warn error_code=stats_read_failed");
                None
            }
        };
        let in_sync = cached.as_ref() == Some(&recomputed);
        self.stats = recomputed;
        if !in_sync {
            self.persist_stats();
        }

        info!(
            "event=roster_load module=service status=ok entries={}",
            self.entries.len()
        );
        Ok(())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get_entry(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn stats(&self) -> &RosterStats {
        &self.stats
    }

    /// Creates an entry with a fresh id and creation timestamps.
    pub fn add_entry(&mut self, input: NewEntry) -> ServiceResult<Entry> {
        let entry = Entry::create(input, Utc::now());
        entry.validate()?;

        let mut next = self.entries.clone();
        next.push(entry.clone());
        self.commit(next)?;

        info!(
            "event=entry_add module=service status=ok entries={}",
            self.entries.len()
        );
        Ok(entry)
    }

    /// Merges a partial update into an existing entry.
    pub fn update_entry(&mut self, id: &str, patch: EntryPatch) -> ServiceResult<Entry> {
        let index = self.position(id)?;
        let mut next = self.entries.clone();
        next[index].apply_patch(patch, Utc::now());
        next[index].validate()?;
        let updated = next[index].clone();
        self.commit(next)?;

        info!("event=entry_update module=service status=ok");
        Ok(updated)
    }

    pub fn delete_entry(&mut self, id: &str) -> ServiceResult<()> {
        let index = self.position(id)?;
        let mut next = self.entries.clone();
        next.remove(index);
        self.commit(next)?;

        info!(
            "event=entry_delete module=service status=ok entries={}",
            self.entries.len()
        );
        Ok(())
    }

    /// Applies a drag-and-drop result: `order = index` for each listed id.
    ///
    /// Entries not listed keep their current order. Any unknown id rejects
    /// the whole reorder.
    pub fn reorder(&mut self, ordered_ids: &[EntryId]) -> ServiceResult<()> {
        let now = Utc::now();
        let mut next = self.entries.clone();
        for (slot, id) in ordered_ids.iter().enumerate() {
            let index = self.position(id)?;
            let order = i64::try_from(slot).unwrap_or(i64::MAX);
            next[index].apply_patch(
                EntryPatch {
                    order: Some(Some(order)),
                    ..EntryPatch::default()
                },
                now,
            );
        }
        self.commit(next)?;

        info!(
            "event=roster_reorder module=service status=ok moved={}",
            ordered_ids.len()
        );
        Ok(())
    }

    /// Filtered, display-ordered view of the current roster.
    pub fn project(&self, search_text: &str, sort_mode: SortMode) -> Vec<Entry> {
        project(&self.entries, search_text, sort_mode)
    }

    /// Like [`Self::project`] with a raw sort key; unknown keys keep order.
    pub fn project_by_key(&self, search_text: &str, sort_key: &str) -> Vec<Entry> {
        project_by_key(&self.entries, search_text, sort_key)
    }

    fn position(&self, id: &str) -> ServiceResult<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| ServiceError::EntryNotFound(id.to_string()))
    }

    fn commit(&mut self, next: Vec<Entry>) -> ServiceResult<()> {
        self.store.save_roster(&next)?;
        self.entries = next;
        self.stats = compute_stats(&self.entries);
        self.persist_stats();
        Ok(())
    }

    fn persist_stats(&self) {
        if let Err(err) = self.store.save_stats(&self.stats) {
            warn!(
                "event=stats_save module=service status=warn error_code=stats_save_failed error={err}"
            );
        }
    }
}
