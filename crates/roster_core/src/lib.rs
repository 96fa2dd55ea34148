//! Core domain logic for the Roster dating journal.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;
pub mod view;

pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::entry::{DateEvent, Entry, EntryId, EntryPatch, EntryValidationError, NewEntry};
pub use model::profile::{Challenge, DatingStyle, ProfilePatch, ThemeMode, UserProfile};
pub use model::stats::{BestEntry, RosterStats};
pub use repo::document_store::{DocumentStore, StorageKey, StorageSnapshot};
pub use repo::kv_repo::{KeyValueRepository, RepoError, RepoResult, SqliteKeyValueRepository};
pub use service::profile_service::ProfileService;
pub use service::roster_service::RosterService;
pub use service::{ServiceError, ServiceResult};
pub use stats::aggregate::compute_stats;
pub use view::roster_view::{matches_search, project, project_by_key, SortMode};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
