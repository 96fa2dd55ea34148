//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level roster functions to Dart via FRB.
//! - Keep error semantics simple for UI integration.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call reads the latest committed roster before acting.
//! - Roster calls are serialized process-wide.

use log::warn;
use roster_core::db::open_db;
use roster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Entry, EntryPatch, NewEntry, RosterService, RosterStats, ServiceResult, SortMode,
    SqliteKeyValueRepository,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const ROSTER_DB_FILE_NAME: &str = "roster_app.sqlite3";
const ROSTER_DB_PATH_ENV: &str = "ROSTER_DB_PATH";
static ROSTER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
// Roster saves are whole-document; calls must not interleave.
static ROSTER_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One rating category score supplied by the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingInput {
    pub category: String,
    pub score: u8,
}

/// Entry form payload for create/update calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryInput {
    pub name: String,
    pub emoji: String,
    pub ratings: Vec<RatingInput>,
    pub flags: Vec<String>,
    pub notes: String,
    pub how_we_met: String,
    pub age: Option<u32>,
    pub height: Option<String>,
}

/// Roster row for list rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterItem {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub average_rating: f64,
    pub flags: Vec<String>,
    pub date_count: u32,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub order: Option<i64>,
}

/// List response envelope for the roster screen.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterListResponse {
    pub ok: bool,
    pub items: Vec<RosterItem>,
    /// Sort key actually applied (`custom` when the input key is unknown).
    pub applied_sort: String,
    pub message: String,
}

/// Sort menu option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOption {
    pub key: String,
    pub label: String,
}

/// One `YYYY-MM` bucket of the stats screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthCount {
    pub month: String,
    pub count: u32,
}

/// Stats envelope for the stats/profile screens.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsResponse {
    pub ok: bool,
    pub total_entries: u32,
    pub average_rating: f64,
    pub most_common_flag: String,
    pub best_entry_name: String,
    pub best_entry_rating: f64,
    pub ghosting_rate: f64,
    /// Newest month first.
    pub months: Vec<MonthCount>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterActionResponse {
    pub ok: bool,
    pub entry_id: Option<String>,
    pub message: String,
}

impl RosterActionResponse {
    fn success(message: impl Into<String>, entry_id: Option<String>) -> Self {
        Self {
            ok: true,
            entry_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entry_id: None,
            message: message.into(),
        }
    }
}

/// Returns sort menu options in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_sort_options() -> Vec<SortOption> {
    SortMode::ALL
        .iter()
        .map(|mode| SortOption {
            key: mode.as_key().to_string(),
            label: mode.label().to_string(),
        })
        .collect()
}

/// Lists roster entries filtered by `search_text` and ordered by `sort_key`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Unknown sort keys keep stored order.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_list(search_text: String, sort_key: String) -> RosterListResponse {
    let applied_sort = SortMode::from_key(&sort_key)
        .map(|mode| mode.as_key().to_string())
        .unwrap_or_else(|| SortMode::Custom.as_key().to_string());

    match with_roster_service(|service| Ok(service.project_by_key(&search_text, &sort_key))) {
        Ok(entries) => {
            let items = entries.iter().map(to_roster_item).collect::<Vec<_>>();
            let message = if items.is_empty() {
                "No entries.".to_string()
            } else {
                format!("Found {} entr(ies).", items.len())
            };
            RosterListResponse {
                ok: true,
                items,
                applied_sort,
                message,
            }
        }
        Err(err) => RosterListResponse {
            ok: false,
            items: Vec::new(),
            applied_sort,
            message: format!("roster_list failed: {err}"),
        },
    }
}

/// Creates one roster entry from the entry form.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_add_entry(input: EntryInput) -> RosterActionResponse {
    let input = to_new_entry(input);
    match with_roster_service(|service| service.add_entry(input)) {
        Ok(entry) => RosterActionResponse::success("Entry added.", Some(entry.id)),
        Err(err) => RosterActionResponse::failure(format!("roster_add_entry failed: {err}")),
    }
}

/// Replaces the form-editable fields of one entry.
///
/// Dates and manual order are kept as stored.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_update_entry(id: String, input: EntryInput) -> RosterActionResponse {
    let fields = to_new_entry(input);
    let patch = EntryPatch {
        name: Some(fields.name),
        emoji: Some(fields.emoji),
        ratings: Some(fields.ratings),
        notes: Some(fields.notes),
        flags: Some(fields.flags),
        how_we_met: Some(fields.how_we_met),
        age: Some(fields.age),
        height: Some(fields.height),
        ..EntryPatch::default()
    };
    match with_roster_service(|service| service.update_entry(&id, patch)) {
        Ok(entry) => RosterActionResponse::success("Entry updated.", Some(entry.id)),
        Err(err) => RosterActionResponse::failure(format!("roster_update_entry failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn roster_delete_entry(id: String) -> RosterActionResponse {
    match with_roster_service(|service| service.delete_entry(&id)) {
        Ok(()) => RosterActionResponse::success("Entry deleted.", Some(id)),
        Err(err) => RosterActionResponse::failure(format!("roster_delete_entry failed: {err}")),
    }
}

/// Persists a drag-and-drop result; `ids` is the new visual order.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_reorder(ids: Vec<String>) -> RosterActionResponse {
    match with_roster_service(|service| service.reorder(&ids)) {
        Ok(()) => RosterActionResponse::success("Roster reordered.", None),
        Err(err) => RosterActionResponse::failure(format!("roster_reorder failed: {err}")),
    }
}

/// Returns stats recomputed from the current roster.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_stats() -> StatsResponse {
    match with_roster_service(|service| Ok(service.stats().clone())) {
        Ok(stats) => to_stats_response(&stats, "ok".to_string()),
        Err(err) => {
            let mut response =
                to_stats_response(&RosterStats::empty(), format!("roster_stats failed: {err}"));
            response.ok = false;
            response
        }
    }
}

fn resolve_roster_db_path() -> PathBuf {
    ROSTER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(ROSTER_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(ROSTER_DB_FILE_NAME)
        })
        .clone()
}

fn with_roster_service<T>(
    f: impl FnOnce(&mut RosterService<SqliteKeyValueRepository<'_>>) -> ServiceResult<T>,
) -> Result<T, String> {
    let _guard = ROSTER_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let db_path = resolve_roster_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("roster DB open failed: {err}"))?;
    let repo = SqliteKeyValueRepository::try_new(&conn)
        .map_err(|err| format!("roster repo init failed: {err}"))?;
    let mut service = RosterService::new(repo);
    service.load().map_err(|err| {
        warn!("event=ffi_roster_load module=ffi status=error error_code=roster_load_failed");
        format!("roster load failed: {err}")
    })?;
    f(&mut service).map_err(|err| err.to_string())
}

fn to_new_entry(input: EntryInput) -> NewEntry {
    let ratings = input
        .ratings
        .into_iter()
        .map(|rating| (rating.category, rating.score))
        .collect::<BTreeMap<_, _>>();
    NewEntry {
        name: input.name.trim().to_string(),
        emoji: input.emoji,
        ratings,
        notes: input.notes,
        flags: input.flags,
        how_we_met: input.how_we_met,
        age: input.age,
        height: input.height,
        ..NewEntry::default()
    }
}

fn to_roster_item(entry: &Entry) -> RosterItem {
    RosterItem {
        id: entry.id.clone(),
        name: entry.name.clone(),
        emoji: entry.emoji.clone(),
        average_rating: entry.average_rating(),
        flags: entry.flags.clone(),
        date_count: u32::try_from(entry.dates.len()).unwrap_or(u32::MAX),
        created_at: entry.created_at.to_rfc3339(),
        order: entry.order,
    }
}

fn to_stats_response(stats: &RosterStats, message: String) -> StatsResponse {
    StatsResponse {
        ok: true,
        total_entries: stats.total_entries,
        average_rating: stats.average_rating,
        most_common_flag: stats.most_common_flag.clone(),
        best_entry_name: stats.best_entry.name.clone(),
        best_entry_rating: stats.best_entry.rating,
        ghosting_rate: stats.ghosting_rate,
        months: stats
            .months_newest_first()
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, roster_add_entry, roster_delete_entry, roster_list,
        roster_reorder, roster_sort_options, roster_stats, roster_update_entry, EntryInput,
        RatingInput,
    };
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn sort_options_cover_every_mode() {
        let options = roster_sort_options();
        assert_eq!(options.len(), 7);
        assert_eq!(options[0].key, "custom");
        assert_eq!(options[5].label, "Name (A-Z)");
    }

    #[test]
    fn add_then_search_finds_entry() {
        let token = unique_token("ffi-add");
        let created = roster_add_entry(EntryInput {
            name: token.clone(),
            ratings: vec![RatingInput {
                category: "vibe".to_string(),
                score: 4,
            }],
            ..EntryInput::default()
        });
        assert!(created.ok, "{}", created.message);
        let entry_id = created.entry_id.expect("add should return entry_id");

        let listed = roster_list(token.to_uppercase(), "name_az".to_string());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.applied_sort, "name_az");
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, entry_id);
        assert_eq!(listed.items[0].average_rating, 4.0);

        let stats = roster_stats();
        assert!(stats.ok, "{}", stats.message);
        assert!(stats.total_entries >= 1);
    }

    #[test]
    fn unknown_sort_key_falls_back_to_custom() {
        let listed = roster_list(unique_token("nobody"), "by_zodiac".to_string());
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.applied_sort, "custom");
        assert!(listed.items.is_empty());
    }

    #[test]
    fn add_rejects_out_of_range_rating() {
        let response = roster_add_entry(EntryInput {
            name: unique_token("ffi-bad-rating"),
            ratings: vec![RatingInput {
                category: "humor".to_string(),
                score: 9,
            }],
            ..EntryInput::default()
        });
        assert!(!response.ok);
        assert!(response.message.contains("humor"));
    }

    #[test]
    fn update_reorder_and_delete_round_trip() {
        let token = unique_token("ffi-lifecycle");
        let created = roster_add_entry(EntryInput {
            name: token.clone(),
            ..EntryInput::default()
        });
        assert!(created.ok, "{}", created.message);
        let entry_id = created.entry_id.unwrap();

        let updated = roster_update_entry(
            entry_id.clone(),
            EntryInput {
                name: token.clone(),
                notes: "likes jazz".to_string(),
                ..EntryInput::default()
            },
        );
        assert!(updated.ok, "{}", updated.message);

        let reordered = roster_reorder(vec![entry_id.clone()]);
        assert!(reordered.ok, "{}", reordered.message);
        let listed = roster_list(token.clone(), "custom".to_string());
        assert_eq!(listed.items[0].order, Some(0));

        let deleted = roster_delete_entry(entry_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(roster_list(token, "custom".to_string()).items.is_empty());

        let missing = roster_delete_entry(entry_id);
        assert!(!missing.ok);
        assert!(missing.message.contains("not found"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
