use chrono::{DateTime, Utc};
use roster_core::db::open_db_in_memory;
use roster_core::{
    compute_stats, DatingStyle, DocumentStore, Entry, KeyValueRepository, NewEntry, RepoError,
    SqliteKeyValueRepository, StorageKey, UserProfile,
};
use std::collections::BTreeMap;

fn sample_entry(id: &str, name: &str) -> Entry {
    let now: DateTime<Utc> = "2024-04-02T18:30:00.000Z".parse().unwrap();
    let mut ratings = BTreeMap::new();
    ratings.insert("vibe".to_string(), 4);
    Entry::with_id(
        id,
        NewEntry {
            name: name.to_string(),
            emoji: "🌮".to_string(),
            ratings,
            flags: vec!["funny".to_string()],
            ..NewEntry::default()
        },
        now,
    )
}

#[test]
fn missing_documents_read_as_defaults() {
    let conn = open_db_in_memory().unwrap();
    let store = DocumentStore::new(SqliteKeyValueRepository::try_new(&conn).unwrap());

    assert!(store.get_roster().unwrap().is_empty());
    assert!(store.get_profile().unwrap().is_none());
    assert!(store.get_challenges().unwrap().is_empty());
    assert!(store.get_stats().unwrap().is_none());
    assert!(!store.get_onboarding_completed().unwrap());
}

#[test]
fn roster_document_keeps_camel_case_wire_shape() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let store = DocumentStore::new(&repo);

    let entry = sample_entry("abc123xyz", "Sam");
    store.save_roster(std::slice::from_ref(&entry)).unwrap();

    let raw = repo.get_item("@roster/roster").unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], "abc123xyz");
    assert_eq!(json[0]["howWeMet"], "");
    assert_eq!(json[0]["ratings"]["vibe"], 4);
    assert!(json[0]["createdAt"].as_str().unwrap().starts_with("2024-04-02T18:30:00"));
    assert!(json[0].get("order").is_none());

    assert_eq!(store.get_roster().unwrap(), vec![entry]);
}

#[test]
fn roster_written_by_older_clients_decodes_with_defaults() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    repo.set_item(
        "@roster/roster",
        r#"[{"id":"k3j9","name":"Max","ratings":{},"createdAt":"2024-01-05T10:00:00.000Z","updatedAt":"2024-01-06T10:00:00.000Z","order":2}]"#,
    )
    .unwrap();

    let roster = DocumentStore::new(&repo).get_roster().unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Max");
    assert_eq!(roster[0].order, Some(2));
    assert!(roster[0].flags.is_empty());
    assert!(roster[0].dates.is_empty());
}

#[test]
fn corrupt_documents_are_rejected_not_masked() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    repo.set_item("@roster/roster", "{not json").unwrap();
    repo.set_item(
        "@roster/stats",
        r#"{"totalEntries":"many"}"#,
    )
    .unwrap();

    let store = DocumentStore::new(&repo);
    assert!(matches!(
        store.get_roster().unwrap_err(),
        RepoError::InvalidData(_)
    ));
    assert!(matches!(
        store.get_stats().unwrap_err(),
        RepoError::InvalidData(_)
    ));
}

#[test]
fn persisted_entry_with_out_of_range_rating_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    repo.set_item(
        "@roster/roster",
        r#"[{"id":"a","ratings":{"vibe":9},"createdAt":"2024-01-05T10:00:00Z","updatedAt":"2024-01-05T10:00:00Z"}]"#,
    )
    .unwrap();

    let err = DocumentStore::new(&repo).get_roster().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn save_roster_rejects_invalid_entries_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let store = DocumentStore::new(&repo);

    let mut entry = sample_entry("a", "Sam");
    entry.ratings.insert("humor".to_string(), 0);
    let err = store.save_roster(&[entry]).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.get_item("@roster/roster").unwrap().is_none());
}

#[test]
fn stats_profile_and_onboarding_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let store = DocumentStore::new(SqliteKeyValueRepository::try_new(&conn).unwrap());

    let stats = compute_stats(&[sample_entry("a", "Sam")]);
    store.save_stats(&stats).unwrap();
    store
        .save_profile(&UserProfile::new("🦄", DatingStyle::Exploring))
        .unwrap();
    store.save_onboarding_completed(true).unwrap();

    let snapshot = store.storage_snapshot().unwrap();
    assert_eq!(snapshot.stats, Some(stats));
    assert_eq!(snapshot.profile.unwrap().dating_style, DatingStyle::Exploring);
    assert!(snapshot.onboarding_completed);
}

#[test]
fn clear_all_removes_every_app_document() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    repo.set_item("unrelated/key", "1").unwrap();
    let store = DocumentStore::new(&repo);
    store.save_roster(&[sample_entry("a", "Sam")]).unwrap();
    store.save_onboarding_completed(true).unwrap();

    assert_eq!(store.clear_all().unwrap(), 2);
    let keys = repo.list_keys().unwrap();
    assert_eq!(keys, vec!["unrelated/key".to_string()]);
    for key in StorageKey::ALL {
        assert!(repo.get_item(key.as_str()).unwrap().is_none());
    }
}

#[test]
fn repository_requires_migrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("kv_store")));
}
