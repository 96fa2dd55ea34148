use roster_core::db::open_db_in_memory;
use roster_core::{
    DatingStyle, NewEntry, ProfilePatch, ProfileService, RosterService, ServiceError,
    SqliteKeyValueRepository, ThemeMode, UserProfile,
};

#[test]
fn fresh_store_loads_empty_profile_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::new(&repo);
    service.load().unwrap();

    assert!(service.profile().is_none());
    assert!(service.challenges().is_empty());
    assert!(service.stats().is_none());
    assert!(!service.has_onboarded());
}

#[test]
fn new_profile_gets_default_badge_and_categories() {
    let profile = UserProfile::new("🐙", DatingStyle::Serious);
    assert_eq!(profile.badge, "Newbie");
    assert_eq!(profile.theme, ThemeMode::Light);
    assert!(profile.selected_ratings.contains(&"vibe".to_string()));
    assert_eq!(profile.selected_ratings.len(), 10);
}

#[test]
fn update_profile_merges_and_persists() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::new(&repo);

    let untouched = service
        .update_profile(ProfilePatch {
            badge: Some("Pro".to_string()),
            ..ProfilePatch::default()
        })
        .unwrap();
    assert!(untouched.is_none());

    service
        .save_profile(UserProfile::new("🐙", DatingStyle::Casual))
        .unwrap();
    service
        .update_profile(ProfilePatch {
            theme: Some(ThemeMode::Dark),
            custom_theme: Some(Some("sunset".to_string())),
            ..ProfilePatch::default()
        })
        .unwrap();

    let mut reloaded = ProfileService::new(&repo);
    reloaded.load().unwrap();
    let profile = reloaded.profile().unwrap();
    assert_eq!(profile.avatar, "🐙");
    assert_eq!(profile.theme, ThemeMode::Dark);
    assert_eq!(profile.custom_theme.as_deref(), Some("sunset"));
}

#[test]
fn complete_challenge_sets_completion_once() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::new(&repo);

    let challenge = service
        .add_challenge("First date", "Go on one date this week")
        .unwrap();
    assert!(!challenge.completed);

    let completed = service.complete_challenge(&challenge.id).unwrap();
    assert!(completed.completed);
    let first_completion = completed.completed_at.unwrap();

    let again = service.complete_challenge(&challenge.id).unwrap();
    assert_eq!(again.completed_at, Some(first_completion));

    let mut reloaded = ProfileService::new(&repo);
    reloaded.load().unwrap();
    assert!(reloaded.challenges()[0].completed);
}

#[test]
fn update_challenge_rejects_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::new(&repo);
    let mut challenge = service.add_challenge("Ask first", "").unwrap();
    challenge.id = "other".to_string();

    let err = service.update_challenge(challenge).unwrap_err();
    assert!(matches!(err, ServiceError::ChallengeNotFound(id) if id == "other"));
}

#[test]
fn onboarding_flag_can_be_completed_and_reset() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::new(&repo);

    service.complete_onboarding().unwrap();
    let mut reloaded = ProfileService::new(&repo);
    reloaded.load().unwrap();
    assert!(reloaded.has_onboarded());

    reloaded.reset_onboarding().unwrap();
    assert!(!reloaded.has_onboarded());
}

#[test]
fn reload_stats_sees_roster_mutations_and_clear_all_resets() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteKeyValueRepository::try_new(&conn).unwrap();
    let mut roster = RosterService::new(&repo);
    let mut profile = ProfileService::new(&repo);
    profile.load().unwrap();

    roster
        .add_entry(NewEntry {
            name: "Sam".to_string(),
            ..NewEntry::default()
        })
        .unwrap();
    profile.save_profile(UserProfile::new("🐙", DatingStyle::Casual)).unwrap();

    let stats = profile.reload_stats().unwrap().cloned().unwrap();
    assert_eq!(stats.total_entries, 1);

    let snapshot = profile.storage_snapshot().unwrap();
    assert_eq!(snapshot.roster.len(), 1);

    assert_eq!(profile.clear_all().unwrap(), 3);
    assert!(profile.profile().is_none());
    assert!(profile.stats().is_none());
    assert!(profile.storage_snapshot().unwrap().roster.is_empty());
}
