use kindred_store::repo::TutorialFlags;
use kindred_store::{Store, StoreErrorKind};

fn store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

#[test]
fn upsert_is_keyed_by_normalized_email() {
    let store = store();
    let now = 1_700_000_000;

    let first = store
        .users()
        .upsert(now, "  Grace@Example.com ", Some("Grace"))
        .expect("create");
    assert_eq!(first.email, "grace@example.com");

    let second = store
        .users()
        .upsert(now + 10, "grace@example.com", None)
        .expect("upsert");
    assert_eq!(second.id, first.id);
    assert_eq!(second.name.as_deref(), Some("Grace"));
    assert_eq!(second.created_at, now);

    let renamed = store
        .users()
        .upsert(now + 20, "grace@example.com", Some("Grace Hopper"))
        .expect("rename");
    assert_eq!(renamed.name.as_deref(), Some("Grace Hopper"));
}

#[test]
fn upsert_rejects_blank_email() {
    let store = store();
    let err = store.users().upsert(1, "   ", None).unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Core);
}

#[test]
fn tutorial_flags_update_independently() {
    let store = store();
    let user = store
        .users()
        .upsert(1_700_000_000, "linus@example.com", None)
        .expect("create");
    assert!(!user.has_viewed_dashboard_tutorial);

    let updated = store
        .users()
        .set_tutorials(
            user.id,
            TutorialFlags {
                dashboard: Some(true),
                ..TutorialFlags::default()
            },
        )
        .expect("set flags");
    assert!(updated.has_viewed_dashboard_tutorial);
    assert!(!updated.has_viewed_contacts_tutorial);
    assert!(!updated.has_viewed_profile_tutorial);

    let updated = store
        .users()
        .set_tutorials(
            user.id,
            TutorialFlags {
                profile: Some(true),
                ..TutorialFlags::default()
            },
        )
        .expect("set flags");
    assert!(updated.has_viewed_dashboard_tutorial);
    assert!(updated.has_viewed_profile_tutorial);
}

#[test]
fn find_by_email_misses_unknown_users() {
    let store = store();
    assert!(store
        .users()
        .find_by_email("nobody@example.com")
        .expect("find")
        .is_none());
}
