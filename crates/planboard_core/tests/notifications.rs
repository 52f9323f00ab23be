use chrono::{Duration, TimeZone, Utc};
use planboard_core::model::notification::{NewNotification, NotificationKind};
use planboard_core::{
    ManualClock, MemoryKeyValueBackend, Notifier, StorageConfig, StorageManager,
};

fn storage() -> (StorageManager<MemoryKeyValueBackend>, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap());
    let storage = StorageManager::with_clock(
        MemoryKeyValueBackend::new(),
        StorageConfig::default(),
        clock.clone(),
    );
    assert!(storage.initialize());
    (storage, clock)
}

#[test]
fn newest_notification_comes_first_and_starts_unread() {
    let (storage, clock) = storage();
    storage.add_notification(NewNotification::info("first")).unwrap();
    clock.advance(Duration::seconds(1));
    storage
        .add_notification(NewNotification::error("second"))
        .unwrap();

    let all = storage.get_notifications();
    assert_eq!(all[0].message, "second");
    assert_eq!(all[0].kind, NotificationKind::Error);
    assert_eq!(all[1].message, "first");
    assert!(all.iter().all(|notification| !notification.read));
    assert_eq!(storage.unread_notification_count(), 2);
}

#[test]
fn list_is_capped_at_one_hundred_dropping_oldest() {
    let (storage, _clock) = storage();
    for n in 0..105 {
        assert!(storage.notify(NewNotification::info(format!("n{n}"))));
    }

    let all = storage.get_notifications();
    assert_eq!(all.len(), 100);
    assert_eq!(all.first().unwrap().message, "n104");
    assert_eq!(all.last().unwrap().message, "n5");
}

#[test]
fn custom_cap_is_honored() {
    let storage = StorageManager::new(
        MemoryKeyValueBackend::new(),
        StorageConfig {
            notification_cap: 3,
            ..StorageConfig::default()
        },
    );
    assert!(storage.initialize());
    for n in 0..5 {
        storage.add_notification(NewNotification::info(format!("n{n}")));
    }
    assert_eq!(storage.get_notifications().len(), 3);
}

#[test]
fn read_state_and_deletion() {
    let (storage, _clock) = storage();
    let first = storage.add_notification(NewNotification::info("a")).unwrap();
    let second = storage
        .add_notification(NewNotification::success("b"))
        .unwrap();

    assert!(storage.mark_notification_read(&first.id));
    assert_eq!(storage.unread_notification_count(), 1);
    assert!(!storage.mark_notification_read("missing"));

    assert!(storage.mark_all_notifications_read());
    assert_eq!(storage.unread_notification_count(), 0);

    assert!(storage.delete_notification(&second.id));
    assert!(!storage.delete_notification(&second.id));
    let remaining = storage.get_notifications();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, first.id);
}

#[test]
fn stored_kind_uses_type_field() {
    let (storage, _clock) = storage();
    storage
        .add_notification(NewNotification::success("saved"))
        .unwrap();
    let json = serde_json::to_value(storage.get_notifications()).unwrap();
    assert_eq!(json[0]["type"], "success");
    assert_eq!(json[0]["read"], false);
}
