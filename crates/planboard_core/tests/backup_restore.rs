use chrono::{TimeZone, Utc};
use planboard_core::model::backup::Backup;
use planboard_core::model::settings::Theme;
use planboard_core::{
    AuthConfig, AuthManager, ManualClock, MemoryKeyValueBackend, NewProject, NewTask,
    StorageConfig, StorageManager,
};
use serde_json::json;

fn storage() -> StorageManager<MemoryKeyValueBackend> {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 2, 10, 8, 0, 0).unwrap());
    let storage =
        StorageManager::with_clock(MemoryKeyValueBackend::new(), StorageConfig::default(), clock);
    assert!(storage.initialize());
    storage
}

#[test]
fn backup_round_trips_into_a_fresh_store() {
    let source = storage();
    {
        let mut auth = AuthManager::new(&source, AuthConfig::instant());
        auth.login("lina@example.com", "secret1").unwrap();
    }
    let project = source.add_project(NewProject::named("Portal")).unwrap();
    source
        .add_task(NewTask::named("Login page").in_project(project.id.clone()))
        .unwrap();

    let document = serde_json::to_value(source.create_backup()).unwrap();
    assert_eq!(document["version"], "1.0.0");
    assert_eq!(document["data"]["projects"][0]["name"], "Portal");
    assert!(document["data"]["teamMembers"].is_array());

    let target = storage();
    assert!(target.restore_from_backup(&document));
    assert_eq!(target.get_projects(), source.get_projects());
    assert_eq!(target.get_tasks(), source.get_tasks());
    assert_eq!(
        target.get_current_user().map(|user| user.email),
        Some("lina@example.com".to_string())
    );
}

#[test]
fn partial_backup_only_replaces_present_members() {
    let storage = storage();
    storage.add_project(NewProject::named("Existing")).unwrap();
    let task = storage.add_task(NewTask::named("Keep me")).unwrap();

    let document = json!({
        "version": "1.0.0",
        "timestamp": "2024-02-10T08:00:00Z",
        "data": {
            "projects": [],
            "settings": { "theme": "dark" }
        }
    });
    assert!(storage.restore_from_backup(&document));

    assert!(storage.get_projects().is_empty());
    assert_eq!(storage.get_tasks(), vec![task]);
    let settings = storage.get_settings();
    assert_eq!(settings.theme, Theme::Dark);
    assert_eq!(settings.language, "ar");
}

#[test]
fn backup_without_data_is_rejected_and_changes_nothing() {
    let storage = storage();
    storage.add_project(NewProject::named("Untouched")).unwrap();
    let before = storage.get_projects();

    assert!(!storage.restore_from_backup(&json!({ "version": "1.0.0" })));
    assert!(!storage.restore_from_backup(&json!({ "data": null })));
    assert!(!storage.restore_from_backup(&json!({ "data": [1, 2, 3] })));
    assert_eq!(storage.get_projects(), before);
}

#[test]
fn malformed_member_rejects_the_whole_backup() {
    let storage = storage();
    storage.add_project(NewProject::named("Untouched")).unwrap();

    let document = json!({
        "data": {
            "projects": [],
            "tasks": "not a list"
        }
    });
    assert!(!storage.restore_from_backup(&document));
    assert_eq!(storage.get_projects().len(), 1);
}

#[test]
fn typed_backup_with_other_version_still_restores() {
    let source = storage();
    source.add_project(NewProject::named("Versioned")).unwrap();
    let mut backup: Backup = source.create_backup();
    backup.version = "0.9.0".to_string();

    let target = storage();
    assert!(target.restore_backup(&backup));
    assert_eq!(target.get_projects().len(), 1);
}
