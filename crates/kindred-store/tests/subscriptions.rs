use kindred_core::domain::SubscriptionId;
use kindred_store::repo::{NotificationPreferences, SubscriptionNew};
use kindred_store::{Store, StoreErrorKind};

const NOW: i64 = 1_700_000_000;

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn registration(user_id: kindred_core::domain::UserId, endpoint: &str) -> SubscriptionNew {
    SubscriptionNew {
        user_id,
        endpoint: endpoint.to_string(),
        p256dh: "p256dh-key".to_string(),
        auth: "auth-secret".to_string(),
    }
}

#[test]
fn upsert_reuses_row_per_endpoint() {
    let store = store();
    let user = store
        .users()
        .upsert(NOW, "owner@example.com", None)
        .expect("user");

    let created = store
        .subscriptions()
        .upsert(NOW, registration(user.id, "https://push.example.com/abc"))
        .expect("create");
    assert!(created.new_action && created.streak && created.meet_goal);

    store
        .subscriptions()
        .update_preferences(
            NOW + 1,
            created.id,
            NotificationPreferences {
                new_action: false,
                streak: true,
                meet_goal: false,
            },
        )
        .expect("prefs");

    let mut again = registration(user.id, "https://push.example.com/abc");
    again.auth = "rotated".to_string();
    let refreshed = store
        .subscriptions()
        .upsert(NOW + 2, again)
        .expect("refresh");
    assert_eq!(refreshed.id, created.id);
    assert_eq!(refreshed.auth, "rotated");
    assert!(!refreshed.new_action);
    assert!(refreshed.streak);
}

#[test]
fn list_new_action_filters_on_preference() {
    let store = store();
    let user = store
        .users()
        .upsert(NOW, "owner@example.com", None)
        .expect("user");
    let keep = store
        .subscriptions()
        .upsert(NOW, registration(user.id, "https://push.example.com/keep"))
        .expect("keep");
    let muted = store
        .subscriptions()
        .upsert(NOW, registration(user.id, "https://push.example.com/muted"))
        .expect("muted");
    store
        .subscriptions()
        .update_preferences(
            NOW,
            muted.id,
            NotificationPreferences {
                new_action: false,
                streak: false,
                meet_goal: false,
            },
        )
        .expect("mute");

    let listed = store.subscriptions().list_new_action().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, keep.id);
}

#[test]
fn blank_endpoint_and_unknown_ids_are_rejected() {
    let store = store();
    let user = store
        .users()
        .upsert(NOW, "owner@example.com", None)
        .expect("user");
    let err = store
        .subscriptions()
        .upsert(NOW, registration(user.id, "  "))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Core);

    let err = store
        .subscriptions()
        .update_preferences(
            NOW,
            SubscriptionId::new(),
            NotificationPreferences {
                new_action: true,
                streak: true,
                meet_goal: true,
            },
        )
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
    assert!(store
        .subscriptions()
        .find_by_endpoint("https://push.example.com/none")
        .expect("find")
        .is_none());
}
